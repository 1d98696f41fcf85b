//! Analysis fields that can be gridded for a domain.

use serde::{Deserialize, Serialize};

use obs_common::{DerivedObservation, Observation};

use crate::config::{InterpMethod, InterpolationParams};

/// A field the orchestrator can grid for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisField {
    /// 2 m temperature (°F).
    Temperature,
    /// 2 m dewpoint (°F).
    Dewpoint,
    /// Sea-level pressure (hPa).
    SeaLevelPressure,
    /// Wind speed (kt).
    WindSpeed,
    /// Vector wind: u and v components gridded separately (kt).
    Wind,
    /// Water vapor mixing ratio (g/kg).
    MixingRatio,
}

impl AnalysisField {
    /// Whether an observation carries the inputs this field needs.
    ///
    /// This is the field-specific completeness sub-filter of QC: an
    /// observation missing a required input is dropped for this field only.
    pub fn inputs_present(&self, obs: &Observation) -> bool {
        match self {
            Self::Temperature => obs.temperature_c.is_finite(),
            Self::Dewpoint => obs.dewpoint_c.is_finite(),
            Self::SeaLevelPressure => obs.sea_level_pressure_hpa.is_finite(),
            Self::WindSpeed => obs.wind_speed_kt.is_finite(),
            Self::Wind => obs.has_wind(),
            Self::MixingRatio => {
                obs.dewpoint_c.is_finite()
                    && obs.sea_level_pressure_hpa.is_finite()
                    && obs.elevation_m.is_finite()
            }
        }
    }

    /// The scalar value delegated to the interpolator for this field.
    ///
    /// `Wind` is gridded as two component passes and has no single scalar;
    /// callers use `wind_components` for it.
    pub fn scalar_value(&self, derived: &DerivedObservation) -> f64 {
        match self {
            Self::Temperature => derived.temperature_f,
            Self::Dewpoint => derived.dewpoint_f,
            Self::SeaLevelPressure => derived.observation.sea_level_pressure_hpa,
            Self::WindSpeed => derived.observation.wind_speed_kt,
            Self::Wind => f64::NAN,
            Self::MixingRatio => derived.mixing_ratio_g_per_kg,
        }
    }

    /// Default interpolation parameters for this field.
    ///
    /// Pressure and wind are analyzed on a coarse grid; pressure accepts a
    /// single neighbor so isobars extend into data-sparse areas.
    pub fn default_interpolation(&self) -> InterpolationParams {
        match self {
            Self::SeaLevelPressure => InterpolationParams {
                method: InterpMethod::Cressman,
                minimum_neighbors: 1,
                search_radius_m: 400_000.0,
                grid_resolution_m: 100_000.0,
            },
            Self::Wind => InterpolationParams {
                method: InterpMethod::Cressman,
                minimum_neighbors: 3,
                search_radius_m: 400_000.0,
                grid_resolution_m: 100_000.0,
            },
            _ => InterpolationParams::default(),
        }
    }

    /// Get the field name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Dewpoint => "dewpoint",
            Self::SeaLevelPressure => "sea_level_pressure",
            Self::WindSpeed => "wind_speed",
            Self::Wind => "wind",
            Self::MixingRatio => "mixing_ratio",
        }
    }
}

impl std::fmt::Display for AnalysisField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
