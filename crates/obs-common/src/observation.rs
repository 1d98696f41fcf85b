//! Station observation records and their derived counterparts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One station's decoded surface report at one valid time.
///
/// Every numeric field uses NaN as the missing-value sentinel. Absence is a
/// first-class representable state here; nothing downstream is allowed to
/// panic on it, and derivations let NaN propagate per IEEE-754.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Station identifier (e.g. "KDFW"). Non-empty.
    pub station_id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Station elevation in meters (NaN when unknown).
    pub elevation_m: f64,
    /// Sea-level pressure in hPa.
    pub sea_level_pressure_hpa: f64,
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Dewpoint in degrees Celsius.
    pub dewpoint_c: f64,
    /// Sky cover fraction, 0.0-1.0 (NaN when unreported).
    pub sky_fraction: f64,
    /// Present-weather code string (may be empty).
    pub present_weather: String,
    /// Wind direction in degrees, 0-360 (NaN when calm/unreported).
    pub wind_dir_deg: f64,
    /// Wind speed in knots (NaN when unreported).
    pub wind_speed_kt: f64,
    /// Valid time of the report.
    pub valid_time: DateTime<Utc>,
}

impl Observation {
    /// True when both wind direction and speed are reported.
    pub fn has_wind(&self) -> bool {
        self.wind_dir_deg.is_finite() && self.wind_speed_kt.is_finite()
    }
}

/// An observation augmented with computed analysis fields.
///
/// Constructed fresh from a QC-passed `Observation` during one orchestration
/// pass, never mutated in place, and discarded when the pass completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedObservation {
    /// The QC-passed source record.
    pub observation: Observation,
    /// Temperature in degrees Fahrenheit.
    pub temperature_f: f64,
    /// Dewpoint in degrees Fahrenheit.
    pub dewpoint_f: f64,
    /// Pressure reduced to station elevation, in hPa.
    pub station_pressure_hpa: f64,
    /// Water vapor mixing ratio in g/kg.
    pub mixing_ratio_g_per_kg: f64,
    /// Equivalent potential temperature in Kelvin (NaN unless a
    /// thermodynamic collaborator supplied it).
    pub equivalent_potential_temperature_k: f64,
    /// Eastward wind component in knots.
    pub wind_u_kt: f64,
    /// Northward wind component in knots.
    pub wind_v_kt: f64,
    /// Sky cover in oktas, 0-8; 10 encodes missing.
    pub sky_cover_octas: u8,
}
