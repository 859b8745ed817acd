//! Placed-volume geometry: local placements, the template → placement index, and resolution of
//! global transforms by walking the ancestor chain.

mod index;
mod placement;
mod resolver;
mod transform;

use std::fmt::Display;

pub use index::VolumeHierarchyIndex;
pub use placement::Placement;
pub use resolver::{ExplicitParents, FirstCandidate, ParentSelector, Strict, TransformResolver};
pub use transform::Transform;

/// Opaque handle of a shape-template (logical volume).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TemplateId(pub u32);

impl Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Position of a placement within the snapshot the index was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PlacementId(pub usize);

impl Display for PlacementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Volume hierarchy index is already built, reset it before building again")]
    DuplicateBuild,

    #[error("Placement {placement} references parent template {parent}, which has no placement")]
    UnresolvedParent {
        placement: PlacementId,
        parent: TemplateId,
    },

    /// The parent template has several placements and no selector picked one of them.
    #[error(
        "Parent template {parent} of placement {placement} has {} candidate placements: {candidates:?}",
        .candidates.len()
    )]
    AmbiguousParent {
        placement: PlacementId,
        parent: TemplateId,
        candidates: Vec<PlacementId>,
    },

    #[error("Cyclic hierarchy: template {template} revisited after {chain:?}")]
    CyclicHierarchy {
        template: TemplateId,
        chain: Vec<TemplateId>,
    },

    #[error("Unknown placement {0}")]
    UnknownPlacement(PlacementId),

    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),
}
