use anyhow::Context;
use comfy_table::Table;
use detsim::geometry::{
    ExplicitParents, FirstCandidate, GeometryError, ParentSelector, Placement, PlacementId,
    Transform, TransformResolver, VolumeHierarchyIndex,
};
use itertools::Itertools;

use crate::options::ResolveOptions;

/// On-disk form of a geometry snapshot.
#[derive(Debug, serde::Deserialize)]
pub struct GeometrySnapshot {
    pub placements: Vec<Placement>,
}

/// Explicit `--parent` assignments first, then the optional first-candidate fallback.
struct CliSelector {
    explicit: ExplicitParents,
    first_candidate: bool,
}

impl ParentSelector for CliSelector {
    fn select(&self, child: PlacementId, candidates: &[PlacementId]) -> Option<PlacementId> {
        self.explicit.select(child, candidates).or_else(|| {
            if !self.first_candidate {
                return None;
            }
            let choice = FirstCandidate.select(child, candidates)?;
            log::warn!(
                "Placement {child} has {} candidate parents, using {choice}",
                candidates.len()
            );
            Some(choice)
        })
    }
}

pub struct Resolution {
    pub index: VolumeHierarchyIndex,
    pub results: Vec<(PlacementId, Result<Transform, GeometryError>)>,
}

impl Resolution {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_header([
            "Placement",
            "Template",
            "Name",
            "Translation",
            "Rotation (w, x, y, z)",
        ]);

        for (id, result) in &self.results {
            let placement = self.index.placement(*id);
            let template = placement.map(|p| p.template.to_string()).unwrap_or_default();
            let name = placement.and_then(|p| p.name.clone()).unwrap_or_default();

            match result {
                Ok(transform) => table.add_row([
                    id.to_string(),
                    template,
                    name,
                    format_components(&transform.translation()),
                    format_components(&transform.quaternion()),
                ]),
                Err(err) => table.add_row([
                    id.to_string(),
                    template,
                    name,
                    format!("error: {err}"),
                    String::new(),
                ]),
            };
        }

        table
    }
}

fn format_components(values: &[f64]) -> String {
    format!("({})", values.iter().map(|v| format!("{v:.4}")).join(", "))
}

pub fn load_snapshot(options: &ResolveOptions) -> anyhow::Result<VolumeHierarchyIndex> {
    let file = std::fs::File::open(&options.geometry)
        .with_context(|| format!("Opening geometry snapshot {}", options.geometry.display()))?;
    let snapshot: GeometrySnapshot = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Parsing geometry snapshot {}", options.geometry.display()))?;

    log::info!(
        "Loaded {} placements from {}",
        snapshot.placements.len(),
        options.geometry.display()
    );

    Ok(VolumeHierarchyIndex::from_placements(snapshot.placements)?)
}

pub fn resolve_snapshot(options: &ResolveOptions) -> anyhow::Result<Resolution> {
    let index = load_snapshot(options)?;

    let selector = CliSelector {
        explicit: options.parents.iter().copied().collect(),
        first_candidate: options.first_candidate,
    };

    let ids: Vec<PlacementId> = if options.placements.is_empty() {
        index.iter().map(|(id, _)| id).collect()
    } else {
        options.placements.iter().copied().map(PlacementId).collect()
    };

    let resolver = TransformResolver::new(&index);
    let results = ids
        .into_iter()
        .map(|id| (id, resolver.resolve_with(id, &selector)))
        .collect();

    Ok(Resolution { index, results })
}
