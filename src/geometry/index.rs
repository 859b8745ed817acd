use std::collections::HashMap;

use super::{GeometryError, Placement, PlacementId, TemplateId};

/// Maps each shape-template to the placements that instantiate it.
///
/// The index owns the placements of one geometry snapshot. It is built once and is read-only
/// afterwards, so a built index can be shared between threads.
#[derive(Debug, Default)]
pub struct VolumeHierarchyIndex {
    placements: Vec<Placement>,
    by_template: HashMap<TemplateId, Vec<PlacementId>>,
    built: bool,
}

impl VolumeHierarchyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and build an index in one step.
    pub fn from_placements(
        placements: impl IntoIterator<Item = Placement>,
    ) -> Result<Self, GeometryError> {
        let mut index = Self::new();
        index.build(placements)?;
        Ok(index)
    }

    /// Populate the index from a geometry snapshot.
    ///
    /// Placement ids are assigned in input order. Fails with [`GeometryError::DuplicateBuild`] if
    /// the index was already built and not [`reset`](Self::reset) since.
    pub fn build(
        &mut self,
        placements: impl IntoIterator<Item = Placement>,
    ) -> Result<(), GeometryError> {
        if self.built {
            return Err(GeometryError::DuplicateBuild);
        }

        self.placements = placements.into_iter().collect();
        for (i, placement) in self.placements.iter().enumerate() {
            self.by_template
                .entry(placement.template)
                .or_default()
                .push(PlacementId(i));
        }
        self.built = true;

        log::debug!(
            "Built volume hierarchy index: {} placements of {} templates",
            self.placements.len(),
            self.by_template.len()
        );

        Ok(())
    }

    /// Drop the snapshot so the index can be built again.
    pub fn reset(&mut self) {
        self.placements.clear();
        self.by_template.clear();
        self.built = false;
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// All placements of `template`, in snapshot order. Empty for unknown templates.
    pub fn placements_of(&self, template: TemplateId) -> &[PlacementId] {
        self.by_template
            .get(&template)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.get(id.0)
    }

    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = (PlacementId, &Placement)> + DoubleEndedIterator {
        self.placements
            .iter()
            .enumerate()
            .map(|(i, placement)| (PlacementId(i), placement))
    }

    /// Placements without a parent template.
    pub fn roots(&self) -> impl Iterator<Item = PlacementId> + '_ {
        self.iter()
            .filter(|(_, placement)| placement.is_root())
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;

    fn snapshot() -> Vec<Placement> {
        vec![
            Placement::root(TemplateId(0)),
            Placement::new(TemplateId(1), TemplateId(0), Transform::identity()),
            Placement::new(
                TemplateId(2),
                TemplateId(1),
                Transform::from_translation([1.0, 0.0, 0.0]),
            ),
            Placement::new(
                TemplateId(2),
                TemplateId(1),
                Transform::from_translation([-1.0, 0.0, 0.0]),
            ),
        ]
    }

    #[test]
    fn test_placements_of() {
        let index = VolumeHierarchyIndex::from_placements(snapshot()).unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(index.placements_of(TemplateId(0)), &[PlacementId(0)]);
        assert_eq!(
            index.placements_of(TemplateId(2)),
            &[PlacementId(2), PlacementId(3)]
        );
        assert!(index.placements_of(TemplateId(9)).is_empty());
        assert_eq!(index.roots().collect::<Vec<_>>(), vec![PlacementId(0)]);
        assert_eq!(
            index.placement(PlacementId(3)).unwrap().transform.translation(),
            [-1.0, 0.0, 0.0]
        );
        assert!(index.placement(PlacementId(4)).is_none());
    }

    #[test]
    fn test_duplicate_build() {
        let mut index = VolumeHierarchyIndex::new();
        assert!(!index.is_built());
        index.build(snapshot()).unwrap();

        assert_eq!(index.build(snapshot()), Err(GeometryError::DuplicateBuild));
        // The failed build leaves the existing snapshot untouched.
        assert_eq!(index.len(), 4);

        index.reset();
        assert!(index.is_empty());
        assert!(index.placements_of(TemplateId(2)).is_empty());

        index.build(snapshot().into_iter().take(2)).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_build_counts_as_built() {
        let mut index = VolumeHierarchyIndex::new();
        index.build(Vec::new()).unwrap();
        assert!(index.is_built());
        assert_eq!(index.build(snapshot()), Err(GeometryError::DuplicateBuild));
    }
}
