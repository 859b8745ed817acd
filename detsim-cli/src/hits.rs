use anyhow::Context;
use comfy_table::Table;
use detsim::hits::{
    ClockUnit, ElementId, HitCollectionRegistry, HitPayload, RegistryOptions, NO_HITS,
};

use crate::options::HitsOptions;

/// Time stamp of a record, either already binned or in ns.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTime {
    TimeBin(u64),
    TimeNs(f64),
}

/// One entry of the hit stream file.
#[derive(Debug, serde::Deserialize)]
pub struct HitRecord {
    pub element: ElementId,
    #[serde(flatten)]
    pub time: HitTime,
    pub payload: HitPayload,
}

pub fn load_stream(options: &HitsOptions) -> anyhow::Result<Vec<HitRecord>> {
    let file = std::fs::File::open(&options.hits)
        .with_context(|| format!("Opening hit stream {}", options.hits.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Parsing hit stream {}", options.hits.display()))
}

/// Feed the hit stream into a registry configured from `options`.
pub fn record_stream(options: &HitsOptions) -> anyhow::Result<HitCollectionRegistry<HitPayload>> {
    let records = load_stream(options)?;

    let mut registry = HitCollectionRegistry::new(RegistryOptions {
        fail_on_unknown_element: options.strict,
        clock_unit: ClockUnit::new(options.clock_unit)?,
    });
    for &element in &options.register {
        registry.register(element);
    }

    for (n, HitRecord { element, time, payload }) in records.into_iter().enumerate() {
        let recorded = match time {
            HitTime::TimeBin(bin) => registry.record_hit(element, bin, payload),
            HitTime::TimeNs(t) => registry.record_time(element, t, payload),
        };
        recorded.with_context(|| format!("Recording hit record {n}"))?;
    }

    log::info!(
        "Recorded {} hits on {} elements",
        registry.total_hits(),
        registry.len()
    );

    Ok(registry)
}

/// Per-element report, restricted to `elements` unless it is empty.
pub fn report_table(
    registry: &HitCollectionRegistry<HitPayload>,
    elements: &[ElementId],
) -> Table {
    let mut table = Table::new();
    table.set_header(["Element", "Time [ns]", "Payload"]);

    let selected = registry
        .iter()
        .filter(|(id, _)| elements.is_empty() || elements.contains(id));

    for (id, collection) in selected {
        if collection.is_empty() {
            table.add_row([id.to_string(), "-".to_string(), "no hits".to_string()]);
        }
        for (time, payload) in collection.report() {
            table.add_row([id.to_string(), format!("{time:.3}"), payload.to_string()]);
        }
    }

    let earliest = registry.earliest_time();
    table.add_row([
        format!("{} elements", registry.len()),
        if earliest == NO_HITS {
            "-".to_string()
        } else {
            format!("first {earliest:.3}")
        },
        format!("{} hits", registry.total_hits()),
    ]);

    table
}
