//! Time-binned hit storage per detector element.

mod clock;
mod collection;
mod payload;
mod registry;

pub use clock::{ClockUnit, BIN_EDGE_TOLERANCE, NO_HITS};
pub use collection::{Hit, HitCollection, Hits};
pub use payload::{CreatorProcess, HitPayload};
pub use registry::{HitCollectionRegistry, RegistryOptions};

/// Integer address of a detector element (e.g. a photosensor channel).
pub type ElementId = u32;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HitError {
    #[error("Unknown detector element {0}")]
    UnknownElement(ElementId),

    #[error("Invalid hit time {0} ns: must be finite and non-negative")]
    InvalidTime(f64),

    #[error("Invalid clock unit {0} ns per bin: must be finite and positive")]
    InvalidClockUnit(f64),

    #[error("Clock unit mismatch: expected {expected} ns per bin, found {found} ns per bin")]
    ClockUnitMismatch { expected: f64, found: f64 },
}
