//! The `detsim` crate holds the two algorithmic cores of a detector simulation: resolving the
//! global pose of placed volumes in a geometry tree, and collecting time-binned hits per detector
//! element.
//!
//! ## Examples
//!
//! ### Resolving a placement
//!
//! ```rust
//! use detsim::geometry::{Placement, TemplateId, Transform, TransformResolver, VolumeHierarchyIndex};
//!
//! let world = TemplateId(0);
//! let vessel = TemplateId(1);
//! let index = VolumeHierarchyIndex::from_placements(vec![
//!     Placement::root(world),
//!     Placement::new(vessel, world, Transform::from_translation([0.0, 0.0, 2.5])),
//! ])
//! .unwrap();
//!
//! let resolver = TransformResolver::new(&index);
//! let id = index.placements_of(vessel)[0];
//! let global = resolver.resolve(id).unwrap();
//! assert_eq!(global.translation(), [0.0, 0.0, 2.5]);
//! ```
//!
//! ### Recording hits
//!
//! ```rust
//! use detsim::hits::{ClockUnit, HitCollectionRegistry, RegistryOptions};
//!
//! let mut registry = HitCollectionRegistry::new(RegistryOptions {
//!     clock_unit: ClockUnit::new(0.5).unwrap(),
//!     ..Default::default()
//! });
//! registry.record_hit(7, 10, "late").unwrap();
//! registry.record_hit(7, 4, "early").unwrap();
//!
//! let pmt = registry.get(7).unwrap();
//! assert_eq!(pmt.earliest_time(), 2.0);
//! assert_eq!(pmt.hits().map(|(_, p)| *p).collect::<Vec<_>>(), ["early", "late"]);
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

pub mod geometry;
pub mod hits;

pub use geometry::GeometryError;
pub use hits::HitError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Hit(#[from] HitError),
}
