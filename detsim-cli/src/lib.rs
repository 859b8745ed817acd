#![doc = include_str!("../README.md")]
#![deny(clippy::all)]

use std::ffi::OsString;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod hits;
pub mod options;
pub mod resolve;

/// Resolve detector geometry and report recorded hits
#[derive(Parser, Debug)]
#[command(name = "detsim", bin_name = "detsim", version)]
pub struct Cli {
    #[command(subcommand)]
    pub action: options::Action,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

pub fn entrypoint() -> anyhow::Result<()> {
    entrypoint_from(std::env::args_os())
}

pub fn entrypoint_from<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Cli { action, verbosity } = Cli::parse_from(args);

    let level = verbosity.log_level_filter().as_str().to_lowercase();
    flexi_logger::Logger::try_with_env_or_str(level)?
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;

    run(action)
}

/// Execute `action`, printing its report to stdout.
pub fn run(action: options::Action) -> anyhow::Result<()> {
    match action {
        options::Action::Resolve(options) => {
            let resolution = resolve::resolve_snapshot(&options)?;
            println!("{}", resolution.table());

            let failures = resolution.failures();
            if failures > 0 {
                anyhow::bail!(
                    "{failures} of {} placements could not be resolved",
                    resolution.results.len()
                );
            }
        }
        options::Action::Hits(options) => {
            let registry = hits::record_stream(&options)?;
            println!("{}", hits::report_table(&registry, &options.elements));
        }
    }

    Ok(())
}
