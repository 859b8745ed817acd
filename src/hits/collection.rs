use std::{
    collections::{btree_map, BTreeMap},
    iter::FusedIterator,
    slice,
};

use super::{ClockUnit, HitError, NO_HITS};

/// A single detection event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit<P> {
    pub time_bin: u64,
    pub payload: P,
}

/// All hits of one detector element, grouped by time-bin.
///
/// Bins are kept in ascending order; hits within a bin keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct HitCollection<P> {
    clock_unit: ClockUnit,
    bins: BTreeMap<u64, Vec<P>>,
    len: usize,
}

impl<P> Default for HitCollection<P> {
    fn default() -> Self {
        Self::new(ClockUnit::default())
    }
}

impl<P> HitCollection<P> {
    pub fn new(clock_unit: ClockUnit) -> Self {
        Self {
            clock_unit,
            bins: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn clock_unit(&self) -> ClockUnit {
        self.clock_unit
    }

    pub fn insert(&mut self, time_bin: u64, payload: P) {
        self.bins.entry(time_bin).or_default().push(payload);
        self.len += 1;
    }

    /// Lowest occupied time-bin.
    pub fn first_bin(&self) -> Option<u64> {
        self.bins.keys().next().copied()
    }

    pub fn first_hit_time(&self) -> Option<f64> {
        self.first_bin().map(|bin| self.clock_unit.to_time(bin))
    }

    /// Time of the earliest hit in ns, or [`NO_HITS`] if the collection is empty.
    pub fn earliest_time(&self) -> f64 {
        self.first_hit_time().unwrap_or(NO_HITS)
    }

    /// `(time_bin, payload)` in arrival order. Calling it again restarts from the first hit.
    pub fn hits(&self) -> Hits<'_, P> {
        Hits {
            bins: self.bins.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// `(time_ns, payload)` in arrival order.
    pub fn report(&self) -> impl Iterator<Item = (f64, &P)> + '_ {
        let unit = self.clock_unit;
        self.hits().map(move |(bin, payload)| (unit.to_time(bin), payload))
    }

    pub fn hits_in_bin(&self, time_bin: u64) -> &[P] {
        self.bins
            .get(&time_bin)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of occupied time-bins.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn clear(&mut self) {
        self.bins.clear();
        self.len = 0;
    }

    /// Move every hit of `other` into `self`. Within a shared bin, `other`'s hits follow the
    /// hits already present.
    pub fn append(&mut self, other: HitCollection<P>) -> Result<(), HitError> {
        if other.clock_unit != self.clock_unit {
            return Err(HitError::ClockUnitMismatch {
                expected: self.clock_unit.ns_per_bin(),
                found: other.clock_unit.ns_per_bin(),
            });
        }
        for (bin, hits) in other.bins {
            self.bins.entry(bin).or_default().extend(hits);
        }
        self.len += other.len;
        Ok(())
    }

    /// Consume the collection, yielding owned hits in arrival order.
    pub fn into_hits(self) -> impl Iterator<Item = Hit<P>> {
        self.bins.into_iter().flat_map(|(time_bin, payloads)| {
            payloads
                .into_iter()
                .map(move |payload| Hit { time_bin, payload })
        })
    }
}

impl<P> Extend<Hit<P>> for HitCollection<P> {
    fn extend<I: IntoIterator<Item = Hit<P>>>(&mut self, iter: I) {
        for Hit { time_bin, payload } in iter {
            self.insert(time_bin, payload);
        }
    }
}

impl<'a, P> IntoIterator for &'a HitCollection<P> {
    type Item = (u64, &'a P);
    type IntoIter = Hits<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits()
    }
}

/// Iterator over the hits of a [`HitCollection`], see [`HitCollection::hits`].
#[derive(Debug)]
pub struct Hits<'a, P> {
    bins: btree_map::Iter<'a, u64, Vec<P>>,
    current: Option<(u64, slice::Iter<'a, P>)>,
    remaining: usize,
}

impl<P> Clone for Hits<'_, P> {
    fn clone(&self) -> Self {
        Self {
            bins: self.bins.clone(),
            current: self.current.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, P> Iterator for Hits<'a, P> {
    type Item = (u64, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((bin, payloads)) = &mut self.current {
                if let Some(payload) = payloads.next() {
                    self.remaining -= 1;
                    return Some((*bin, payload));
                }
            }
            let (&bin, payloads) = self.bins.next()?;
            self.current = Some((bin, payloads.iter()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P> ExactSizeIterator for Hits<'_, P> {}

impl<P> FusedIterator for Hits<'_, P> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_order() {
        let mut pmt = HitCollection::new(ClockUnit::new(0.5).unwrap());
        for (bin, tag) in [(5, "a"), (2, "b"), (5, "c"), (8, "d")] {
            pmt.insert(bin, tag);
        }

        let ordered: Vec<_> = pmt.hits().map(|(bin, tag)| (bin, *tag)).collect();
        assert_eq!(ordered, vec![(2, "b"), (5, "a"), (5, "c"), (8, "d")]);
        assert_eq!(pmt.hits().len(), 4);
        assert_eq!(pmt.bin_count(), 3);
        assert_eq!(pmt.hits_in_bin(5), &["a", "c"]);
        assert!(pmt.hits_in_bin(6).is_empty());

        let times: Vec<_> = pmt.report().map(|(t, _)| t).collect();
        assert_eq!(times, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn test_iterator_restarts() {
        let mut pmt = HitCollection::default();
        pmt.insert(3, 'x');
        pmt.insert(1, 'y');

        let mut first = pmt.hits();
        assert_eq!(first.next(), Some((1, &'y')));
        let rest = first.clone();
        assert_eq!(first.collect::<Vec<_>>(), vec![(3, &'x')]);
        assert_eq!(rest.count(), 1);
        assert_eq!((&pmt).into_iter().count(), 2);
    }

    #[test]
    fn test_append_keeps_existing_hits_first() {
        let mut a = HitCollection::default();
        a.insert(4, 1);
        let mut b = HitCollection::default();
        b.insert(4, 2);
        b.insert(0, 3);

        a.append(b).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.first_bin(), Some(0));
        assert_eq!(a.hits_in_bin(4), &[1, 2]);

        let other = HitCollection::<i32>::new(ClockUnit::new(2.0).unwrap());
        assert_eq!(
            a.append(other),
            Err(HitError::ClockUnitMismatch {
                expected: 1.0,
                found: 2.0
            })
        );
    }

    #[test]
    fn test_extend_and_into_hits() {
        let mut pmt = HitCollection::default();
        pmt.extend([
            Hit {
                time_bin: 9,
                payload: 'a',
            },
            Hit {
                time_bin: 1,
                payload: 'b',
            },
        ]);
        let bins: Vec<_> = pmt.into_hits().map(|hit| hit.time_bin).collect();
        assert_eq!(bins, vec![1, 9]);
    }

    #[test]
    fn test_clear() {
        let mut pmt = HitCollection::default();
        pmt.insert(1, ());
        pmt.clear();
        assert!(pmt.is_empty());
        assert_eq!(pmt.earliest_time(), NO_HITS);
        assert_eq!(pmt.first_hit_time(), None);
        assert_eq!(pmt.hits().next(), None);
    }
}
