//! Named analysis domains and their derived projection parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use obs_common::BoundingBox;

use crate::lambert::LambertConformal;

/// Errors raised while building domains.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid domain '{name}': {message}")]
    InvalidDomain { name: String, message: String },

    #[error("duplicate domain name: {0}")]
    DuplicateName(String),
}

/// Which hemisphere a domain's center falls in.
///
/// A center latitude of exactly 0.0 is treated as Northern; the equatorial
/// case is ambiguous upstream and the northern convention is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    /// Derive the hemisphere from a latitude in degrees.
    pub fn from_latitude(lat: f64) -> Self {
        if lat < 0.0 {
            Self::Southern
        } else {
            Self::Northern
        }
    }
}

/// Conformal conic projection parameters derived from a domain's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConformalConicParams {
    /// Standard parallel in degrees (the domain's center latitude).
    pub standard_parallel: f64,
    /// Central meridian in degrees (the domain's center longitude).
    pub central_meridian: f64,
    /// Latitude at which the projected map is cut off, in degrees.
    /// -30 for northern-hemisphere domains, +30 for southern.
    pub cutoff_latitude: f64,
}

/// A named analysis/plot region with derived projection metadata.
///
/// All derived fields come from the bounding box alone, so rebuilding a
/// domain from an identical box is bit-for-bit idempotent. In particular
/// `flip_wind_barbs` is never hand-set: a domain crossing into the opposite
/// hemisphere cannot silently keep the wrong barb convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub bbox: BoundingBox,
    pub center_lon: f64,
    pub center_lat: f64,
    pub hemisphere: Hemisphere,
    pub projection: ConformalConicParams,
    /// Southern-hemisphere domains draw wind barbs flipped.
    pub flip_wind_barbs: bool,
}

impl Domain {
    /// Build a domain from a name and bounding box, deriving projection
    /// parameters. Fails with `InvalidDomain` for inverted edges; the
    /// failure is scoped to this domain only.
    pub fn from_bbox(name: impl Into<String>, bbox: BoundingBox) -> Result<Self, DomainError> {
        let name = name.into();
        bbox.validate(&name)
            .map_err(|e| DomainError::InvalidDomain {
                name: name.clone(),
                message: e.to_string(),
            })?;

        let (center_lon, center_lat) = bbox.center();
        let hemisphere = Hemisphere::from_latitude(center_lat);
        let cutoff_latitude = match hemisphere {
            Hemisphere::Northern => -30.0,
            Hemisphere::Southern => 30.0,
        };

        Ok(Self {
            name,
            bbox,
            center_lon,
            center_lat,
            hemisphere,
            projection: ConformalConicParams {
                standard_parallel: center_lat,
                central_meridian: center_lon,
                cutoff_latitude,
            },
            flip_wind_barbs: center_lat < 0.0,
        })
    }

    /// The Lambert conformal transform for this domain's parameters.
    pub fn transform(&self) -> LambertConformal {
        LambertConformal::from_params(&self.projection)
    }
}

/// Registry of analysis domains, keyed by name.
///
/// Iteration order is the sorted name order (BTreeMap), so multi-domain
/// batches run deterministically.
#[derive(Debug, Default, Clone)]
pub struct DomainRegistry {
    domains: BTreeMap<String, Domain>,
}

impl DomainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and insert a domain. Rejects duplicate names outright;
    /// invalid bounds fail only this insertion.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        bbox: BoundingBox,
    ) -> Result<&Domain, DomainError> {
        let domain = Domain::from_bbox(name, bbox)?;
        let name = domain.name.clone();
        if self.domains.contains_key(&name) {
            return Err(DomainError::DuplicateName(name));
        }
        Ok(self.domains.entry(name).or_insert(domain))
    }

    /// Look up a domain by name.
    pub fn get(&self, name: &str) -> Option<&Domain> {
        self.domains.get(name)
    }

    /// Iterate over all registered domains in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    /// Number of registered domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
