use std::collections::{btree_map::Entry, BTreeMap};

use super::{ClockUnit, ElementId, HitCollection, HitError, NO_HITS};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RegistryOptions {
    /// Reject hits and lookups for elements that were never registered instead of creating an
    /// empty collection on first use.
    pub fail_on_unknown_element: bool,
    /// Time-bin width shared by every collection of the registry.
    pub clock_unit: ClockUnit,
}

/// Routes hits to per-element [`HitCollection`]s.
#[derive(Debug, Clone)]
pub struct HitCollectionRegistry<P> {
    options: RegistryOptions,
    collections: BTreeMap<ElementId, HitCollection<P>>,
}

impl<P> Default for HitCollectionRegistry<P> {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

impl<P> HitCollectionRegistry<P> {
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            options,
            collections: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Add an empty collection for `element` unless it already has one.
    pub fn register(&mut self, element: ElementId) -> &mut HitCollection<P> {
        let clock_unit = self.options.clock_unit;
        self.collections
            .entry(element)
            .or_insert_with(|| HitCollection::new(clock_unit))
    }

    pub fn record_hit(
        &mut self,
        element: ElementId,
        time_bin: u64,
        payload: P,
    ) -> Result<(), HitError> {
        self.collection_for(element)?.insert(time_bin, payload);
        Ok(())
    }

    /// Quantize `time_ns` with the registry's clock unit, then record the hit.
    pub fn record_time(
        &mut self,
        element: ElementId,
        time_ns: f64,
        payload: P,
    ) -> Result<(), HitError> {
        let time_bin = self.options.clock_unit.quantize(time_ns)?;
        self.record_hit(element, time_bin, payload)
    }

    /// The collection of `element`, created on first use unless `fail_on_unknown_element` is set.
    pub fn collection_for(&mut self, element: ElementId) -> Result<&mut HitCollection<P>, HitError> {
        if self.options.fail_on_unknown_element {
            self.collections
                .get_mut(&element)
                .ok_or(HitError::UnknownElement(element))
        } else {
            Ok(self.register(element))
        }
    }

    /// Read-only lookup; never creates a collection.
    pub fn get(&self, element: ElementId) -> Option<&HitCollection<P>> {
        self.collections.get(&element)
    }

    /// Empty every collection, keeping the registered elements.
    pub fn clear_all(&mut self) {
        self.collections.values_mut().for_each(HitCollection::clear);
    }

    /// Registered element ids, ascending.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.collections.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &HitCollection<P>)> {
        self.collections.iter().map(|(&id, c)| (id, c))
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn total_hits(&self) -> usize {
        self.collections.values().map(HitCollection::len).sum()
    }

    /// Earliest hit time over all elements, or [`NO_HITS`].
    pub fn earliest_time(&self) -> f64 {
        self.collections
            .values()
            .map(HitCollection::earliest_time)
            .fold(NO_HITS, f64::min)
    }

    /// Combine per-worker registries.
    ///
    /// Within a time-bin, hits are ordered by worker position in `workers` and then by their
    /// original insertion order. The result uses the options of the first worker.
    pub fn merge(workers: impl IntoIterator<Item = Self>) -> Result<Self, HitError> {
        let mut workers = workers.into_iter();
        let Some(mut merged) = workers.next() else {
            return Ok(Self::default());
        };

        for (i, worker) in workers.enumerate() {
            let expected = merged.options.clock_unit;
            let found = worker.options.clock_unit;
            if found != expected {
                return Err(HitError::ClockUnitMismatch {
                    expected: expected.ns_per_bin(),
                    found: found.ns_per_bin(),
                });
            }

            log::debug!(
                "Merging {} hits of {} elements from worker {}",
                worker.total_hits(),
                worker.len(),
                i + 1
            );

            for (element, collection) in worker.collections {
                match merged.collections.entry(element) {
                    Entry::Vacant(entry) => {
                        entry.insert(collection);
                    }
                    Entry::Occupied(mut entry) => entry.get_mut().append(collection)?,
                }
            }
        }

        Ok(merged)
    }
}
