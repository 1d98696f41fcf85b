//! Analysis domain configuration and map projection derivation.
//!
//! Each named analysis region derives its own conformal conic projection
//! from its bounding box; nothing projection-related is hand-set per domain.

pub mod domain;
pub mod lambert;

pub use domain::{ConformalConicParams, Domain, DomainError, DomainRegistry, Hemisphere};
pub use lambert::LambertConformal;
