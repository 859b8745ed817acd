//! Hit collections and the per-element registry.

use detsim::hits::{
    ClockUnit, CreatorProcess, HitCollection, HitCollectionRegistry, HitError, HitPayload,
    RegistryOptions, NO_HITS,
};
use rstest::rstest;

fn photon(energy_ev: f64) -> HitPayload {
    HitPayload::Optical {
        process: CreatorProcess::Scintillation,
        energy_ev,
    }
}

#[rstest]
#[case(1.0)]
#[case(0.1)]
#[case(4.0)]
fn test_arrival_order_and_earliest_time(#[case] ns_per_bin: f64) {
    let clock_unit = ClockUnit::new(ns_per_bin).unwrap();
    let mut pmt = HitCollection::new(clock_unit);
    for (bin, energy) in [(5, 2.1), (2, 2.2), (5, 2.3), (8, 2.4)] {
        pmt.insert(bin, photon(energy));
    }

    let ordered: Vec<_> = pmt.hits().collect();
    assert_eq!(
        ordered.iter().map(|(bin, _)| *bin).collect::<Vec<_>>(),
        vec![2, 5, 5, 8]
    );
    assert_eq!(ordered[1].1, &photon(2.1));
    assert_eq!(ordered[2].1, &photon(2.3));
    assert_eq!(pmt.earliest_time(), 2.0 * ns_per_bin);

    let report: Vec<_> = pmt.report().collect();
    assert_eq!(report[0], (2.0 * ns_per_bin, &photon(2.2)));
    assert_eq!(report[3].0, 8.0 * ns_per_bin);
}

#[test]
fn test_empty_sentinel() {
    let pmt = HitCollection::<HitPayload>::default();
    assert!(pmt.is_empty());
    assert_eq!(pmt.earliest_time(), NO_HITS);
    assert!(pmt.earliest_time().is_infinite());
    assert_eq!(pmt.first_hit_time(), None);
}

#[test_log::test]
fn test_strict_registry_rejects_unknown_element() {
    let mut registry = HitCollectionRegistry::new(RegistryOptions {
        fail_on_unknown_element: true,
        ..Default::default()
    });

    assert_eq!(
        registry.record_hit(42, 3, photon(3.0)),
        Err(HitError::UnknownElement(42))
    );
    assert!(matches!(
        registry.collection_for(42),
        Err(HitError::UnknownElement(42))
    ));
    assert!(registry.is_empty());

    registry.register(42);
    registry.record_hit(42, 3, photon(3.0)).unwrap();
    assert_eq!(registry.collection_for(42).unwrap().len(), 1);
}

#[test_log::test]
fn test_lenient_registry_creates_collection() {
    let mut registry = HitCollectionRegistry::default();
    registry.record_hit(42, 3, photon(3.0)).unwrap();

    let pmt = registry.collection_for(42).unwrap();
    assert_eq!(
        pmt.hits().collect::<Vec<_>>(),
        vec![(3, &photon(3.0))]
    );

    // An empty collection is created on lookup, too.
    assert!(registry.collection_for(7).unwrap().is_empty());
    assert_eq!(registry.element_ids().collect::<Vec<_>>(), vec![7, 42]);
}

#[test_log::test]
fn test_clear_all_keeps_elements() {
    let mut registry = HitCollectionRegistry::default();
    for element in [1, 2, 3] {
        registry
            .record_hit(element, u64::from(element) * 10, photon(2.0))
            .unwrap();
    }
    registry.clear_all();

    assert_eq!(registry.len(), 3);
    for (_, collection) in registry.iter() {
        assert!(collection.is_empty());
        assert_eq!(collection.earliest_time(), NO_HITS);
    }
    assert_eq!(registry.earliest_time(), NO_HITS);
}

#[test_log::test]
fn test_merge_workers() {
    let mut first = HitCollectionRegistry::default();
    first.record_hit(1, 5, "w0-a").unwrap();
    first.record_hit(1, 5, "w0-b").unwrap();
    first.record_hit(2, 9, "w0-c").unwrap();

    let mut second = HitCollectionRegistry::default();
    second.record_hit(1, 5, "w1-a").unwrap();
    second.record_hit(1, 1, "w1-b").unwrap();
    second.record_hit(3, 2, "w1-c").unwrap();

    let merged = HitCollectionRegistry::merge([first, second]).unwrap();

    assert_eq!(merged.element_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(merged.total_hits(), 6);
    let element_1: Vec<_> = merged.get(1).unwrap().hits().collect();
    assert_eq!(
        element_1,
        vec![(1, &"w1-b"), (5, &"w0-a"), (5, &"w0-b"), (5, &"w1-a")]
    );
}

#[test]
fn test_merge_rejects_mixed_clock_units() {
    let fine = HitCollectionRegistry::<()>::new(RegistryOptions {
        clock_unit: ClockUnit::new(0.1).unwrap(),
        ..Default::default()
    });
    let coarse = HitCollectionRegistry::<()>::default();

    assert_eq!(
        HitCollectionRegistry::merge([fine, coarse]).err(),
        Some(HitError::ClockUnitMismatch {
            expected: 0.1,
            found: 1.0
        })
    );
    assert!(HitCollectionRegistry::<()>::merge([]).unwrap().is_empty());
}
