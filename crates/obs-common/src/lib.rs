//! Common types shared across the surface-analysis crates.

pub mod bbox;
pub mod error;
pub mod observation;

pub use bbox::BoundingBox;
pub use error::{ObsError, ObsResult};
pub use observation::{DerivedObservation, Observation};
