//! Seams to the external interpolation and thermodynamic collaborators.
//!
//! The analysis core treats both as opaque: it supplies QC'd, derived,
//! projected points and consumes only the shape contract of what comes back.

use serde::{Deserialize, Serialize};

use crate::config::InterpolationParams;

/// One projected observation value: map coordinates in meters plus the
/// field value at that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// A regular grid returned by the interpolation collaborator.
///
/// Values are row-major; NaN marks under-constrained cells and is masked by
/// the rendering layer, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    pub values: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

impl GridField {
    /// Whether the value buffer matches the declared dimensions.
    pub fn shape_consistent(&self) -> bool {
        self.values.len() == self.width * self.height
    }

    /// Fraction of cells the collaborator left unconstrained (NaN).
    pub fn nan_fraction(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let nans = self.values.iter().filter(|v| v.is_nan()).count();
        nans as f64 / self.values.len() as f64
    }
}

/// Spatial interpolation collaborator (e.g. a Cressman analysis).
///
/// Implementations live outside this crate; failures are surfaced to the
/// orchestrator as per-field failures and never abort sibling fields.
pub trait Interpolator {
    /// Grid the scattered points with the given parameters.
    fn interpolate(
        &self,
        points: &[ScatterPoint],
        params: &InterpolationParams,
    ) -> anyhow::Result<GridField>;
}

/// External meteorological-calculation collaborator for equivalent
/// potential temperature. NaN-propagating like the internal calculators.
pub trait ThermoCalculator {
    /// Theta-E in Kelvin from temperature, dewpoint, and station pressure.
    fn theta_e_k(&self, temperature_c: f64, dewpoint_c: f64, pressure_hpa: f64) -> f64;
}
