use std::collections::{HashMap, HashSet};

use nalgebra::Point3;

use super::{GeometryError, Placement, PlacementId, Transform, VolumeHierarchyIndex};

/// Chooses the parent placement when a parent template has several placements.
///
/// Returning `None`, or an id that is not among `candidates`, leaves the ambiguity unresolved
/// and the resolver reports [`GeometryError::AmbiguousParent`].
pub trait ParentSelector {
    fn select(&self, child: PlacementId, candidates: &[PlacementId]) -> Option<PlacementId>;
}

impl<F> ParentSelector for F
where
    F: Fn(PlacementId, &[PlacementId]) -> Option<PlacementId>,
{
    fn select(&self, child: PlacementId, candidates: &[PlacementId]) -> Option<PlacementId> {
        self(child, candidates)
    }
}

/// Never picks a candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Strict;

impl ParentSelector for Strict {
    fn select(&self, _child: PlacementId, _candidates: &[PlacementId]) -> Option<PlacementId> {
        None
    }
}

/// Picks the first candidate in snapshot order.
///
/// Only correct when the caller knows every placement of an ambiguous template is
/// interchangeable for the purpose at hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidate;

impl ParentSelector for FirstCandidate {
    fn select(&self, _child: PlacementId, candidates: &[PlacementId]) -> Option<PlacementId> {
        candidates.first().copied()
    }
}

/// Explicit child placement → parent placement assignments.
#[derive(Debug, Default, Clone)]
pub struct ExplicitParents(HashMap<PlacementId, PlacementId>);

impl ExplicitParents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, child: PlacementId, parent: PlacementId) -> &mut Self {
        self.0.insert(child, parent);
        self
    }
}

impl FromIterator<(PlacementId, PlacementId)> for ExplicitParents {
    fn from_iter<I: IntoIterator<Item = (PlacementId, PlacementId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ParentSelector for ExplicitParents {
    fn select(&self, child: PlacementId, _candidates: &[PlacementId]) -> Option<PlacementId> {
        self.0.get(&child).copied()
    }
}

/// Resolves global transforms by composing local placement transforms up to the root.
#[derive(Debug, Clone, Copy)]
pub struct TransformResolver<'a> {
    index: &'a VolumeHierarchyIndex,
}

impl<'a> TransformResolver<'a> {
    pub fn new(index: &'a VolumeHierarchyIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a VolumeHierarchyIndex {
        self.index
    }

    /// Global (root frame) transform of placement `id`.
    ///
    /// Ambiguous parents are reported, never guessed. See [`resolve_with`](Self::resolve_with).
    pub fn resolve(&self, id: PlacementId) -> Result<Transform, GeometryError> {
        self.resolve_with(id, &Strict)
    }

    /// Like [`resolve`](Self::resolve), with `selector` deciding between multiple placements of
    /// a parent template.
    pub fn resolve_with<S>(&self, id: PlacementId, selector: &S) -> Result<Transform, GeometryError>
    where
        S: ParentSelector + ?Sized,
    {
        let mut global = Transform::identity();
        self.walk(id, selector, |_, placement| {
            global = global.then(&placement.transform);
        })?;
        Ok(global)
    }

    /// The placement chain from `id` (inclusive) up to its root.
    pub fn ancestors(&self, id: PlacementId) -> Result<Vec<PlacementId>, GeometryError> {
        let mut chain = Vec::new();
        self.walk(id, &Strict, |id, _| chain.push(id))?;
        Ok(chain)
    }

    /// Map a point given in the local frame of placement `id` into the root frame.
    pub fn global_point(
        &self,
        id: PlacementId,
        local: Point3<f64>,
    ) -> Result<Point3<f64>, GeometryError> {
        Ok(self.resolve(id)?.apply_point(local))
    }

    /// Resolve every placement of the index, in snapshot order.
    pub fn resolve_all(&self) -> Vec<(PlacementId, Result<Transform, GeometryError>)> {
        self.index
            .iter()
            .map(|(id, _)| (id, self.resolve(id)))
            .collect()
    }

    /// Visit `id` and each ancestor placement, innermost first.
    fn walk<S, F>(&self, id: PlacementId, selector: &S, mut visit: F) -> Result<(), GeometryError>
    where
        S: ParentSelector + ?Sized,
        F: FnMut(PlacementId, &Placement),
    {
        let mut current = id;
        let mut placement = self
            .index
            .placement(id)
            .ok_or(GeometryError::UnknownPlacement(id))?;

        let mut seen = HashSet::from([placement.template]);
        let mut chain = vec![placement.template];

        loop {
            visit(current, placement);

            let Some(parent) = placement.parent else {
                return Ok(());
            };

            if !seen.insert(parent) {
                return Err(GeometryError::CyclicHierarchy {
                    template: parent,
                    chain,
                });
            }
            chain.push(parent);

            let next = match self.index.placements_of(parent) {
                [] => {
                    return Err(GeometryError::UnresolvedParent {
                        placement: current,
                        parent,
                    })
                }
                [only] => *only,
                candidates => selector
                    .select(current, candidates)
                    .filter(|choice| candidates.contains(choice))
                    .ok_or_else(|| GeometryError::AmbiguousParent {
                        placement: current,
                        parent,
                        candidates: candidates.to_vec(),
                    })?,
            };

            log::trace!("Placement {current} -> parent placement {next} (template {parent})");

            current = next;
            placement = self
                .index
                .placement(next)
                .ok_or(GeometryError::UnknownPlacement(next))?;
        }
    }
}
