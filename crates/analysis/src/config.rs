//! Configuration for the analysis orchestrator.
//!
//! All tunables live in an explicit structure handed to the orchestrator at
//! construction time; no module-level state survives between batches.

use serde::{Deserialize, Serialize};

use obs_common::BoundingBox;

use crate::field::AnalysisField;

/// Default spatial QC padding around a domain, in degrees.
pub const DEFAULT_PADDING_DEG: f64 = 2.0;

/// A named analysis region as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub name: String,
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl DomainSpec {
    /// Create a domain spec from edge coordinates.
    pub fn new(name: impl Into<String>, west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            name: name.into(),
            west,
            east,
            south,
            north,
        }
    }

    /// The bounding box for this spec (not yet validated).
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.west, self.east, self.south, self.north)
    }
}

/// Objective-analysis method requested from the interpolation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpMethod {
    /// Cressman distance-weighted analysis.
    #[default]
    Cressman,
    /// Barnes Gaussian-weighted analysis.
    Barnes,
}

impl InterpMethod {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// Cressman.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "barnes" => Self::Barnes,
            _ => Self::Cressman,
        }
    }

    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cressman => "cressman",
            Self::Barnes => "barnes",
        }
    }
}

impl std::fmt::Display for InterpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters handed to the interpolation collaborator alongside the
/// scattered points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationParams {
    pub method: InterpMethod,
    /// Minimum neighbors required before a grid cell gets a value.
    pub minimum_neighbors: usize,
    /// Search radius in meters.
    pub search_radius_m: f64,
    /// Output grid resolution in meters.
    pub grid_resolution_m: f64,
}

impl Default for InterpolationParams {
    fn default() -> Self {
        Self {
            method: InterpMethod::Cressman,
            minimum_neighbors: 3,
            search_radius_m: 400_000.0,
            grid_resolution_m: 35_000.0,
        }
    }
}

/// Configuration for one analysis batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis regions to process.
    pub domains: Vec<DomainSpec>,

    /// Fields to grid per domain.
    pub fields: Vec<AnalysisField>,

    /// Spatial QC padding around each domain, in degrees.
    pub padding_deg: f64,

    /// Reuse the per-domain filtered/derived observation set across scalar
    /// field passes instead of recomputing it per field. Trades memory for
    /// avoided recomputation; never changes results.
    pub restart_domain: bool,

    /// Optional override applied to every field's interpolation parameters.
    /// When None, each field uses its own defaults.
    pub interpolation: Option<InterpolationParams>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            fields: vec![
                AnalysisField::Temperature,
                AnalysisField::Dewpoint,
                AnalysisField::WindSpeed,
            ],
            padding_deg: DEFAULT_PADDING_DEG,
            restart_domain: true,
            interpolation: None,
        }
    }
}

impl AnalysisConfig {
    /// Load overrides from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ANALYSIS_PADDING_DEG") {
            if let Ok(padding) = val.parse() {
                config.padding_deg = padding;
            }
        }

        if let Ok(val) = std::env::var("ANALYSIS_RESTART_DOMAIN") {
            config.restart_domain = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("ANALYSIS_INTERP_METHOD") {
            let mut params = config.interpolation.unwrap_or_default();
            params.method = InterpMethod::from_str(&val);
            config.interpolation = Some(params);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.padding_deg.is_finite() || self.padding_deg < 0.0 {
            return Err("padding_deg must be finite and >= 0".to_string());
        }

        if self.fields.is_empty() {
            return Err("at least one analysis field is required".to_string());
        }

        if let Some(params) = &self.interpolation {
            if params.search_radius_m <= 0.0 {
                return Err("search_radius_m must be > 0".to_string());
            }
            if params.grid_resolution_m <= 0.0 {
                return Err("grid_resolution_m must be > 0".to_string());
            }
        }

        Ok(())
    }
}
