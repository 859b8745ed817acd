use std::path::PathBuf;

use clap::{Args, Subcommand};
use detsim::{geometry::PlacementId, hits::ElementId};

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Resolve global transforms of the placements in a geometry snapshot
    Resolve(ResolveOptions),
    /// Record a hit stream and print the per-element hit report
    Hits(HitsOptions),
}

#[derive(Debug, Default, Args)]
pub struct ResolveOptions {
    /// Geometry snapshot (JSON) to load
    #[arg(value_name = "GEOMETRY")]
    pub geometry: PathBuf,

    /// Placement(s) to resolve, all placements if omitted
    #[arg(short = 'p', long = "placement")]
    pub placements: Vec<usize>,

    /// Explicit parent placement for a child with an ambiguous parent, as CHILD=PARENT
    #[arg(long = "parent", value_parser = parse_parent)]
    pub parents: Vec<(PlacementId, PlacementId)>,

    /// Fall back to the first candidate in snapshot order when a parent is ambiguous
    #[arg(long, default_value_t = false)]
    pub first_candidate: bool,
}

#[derive(Debug, Args)]
pub struct HitsOptions {
    /// Hit stream (JSON array of hit records) to load
    #[arg(value_name = "HITS")]
    pub hits: PathBuf,

    /// Reject hits on elements that were not registered with `--register`
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Element(s) to pre-register
    #[arg(long = "register")]
    pub register: Vec<ElementId>,

    /// Time-bin width in ns
    #[arg(long, default_value_t = 1.0)]
    pub clock_unit: f64,

    /// Element(s) to report, all elements if omitted
    #[arg(short = 'e', long = "element")]
    pub elements: Vec<ElementId>,
}

impl Default for HitsOptions {
    fn default() -> Self {
        Self {
            hits: PathBuf::new(),
            strict: false,
            register: Vec::new(),
            clock_unit: 1.0,
            elements: Vec::new(),
        }
    }
}

fn parse_parent(arg: &str) -> Result<(PlacementId, PlacementId), String> {
    let (child, parent) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected CHILD=PARENT, got `{arg}`"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map(PlacementId)
            .map_err(|e| format!("invalid placement id `{s}`: {e}"))
    };
    Ok((parse(child)?, parse(parent)?))
}
