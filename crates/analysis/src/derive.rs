//! Derived-field calculator.
//!
//! Pure, stateless conversions from raw observed quantities to analysis
//! fields. Every function accepts and returns NaN-bearing floats; NaN input
//! propagates to the output per IEEE-754 and never raises. The formulas are
//! empirical fits, good to 3 significant figures against reference values.

use obs_common::{DerivedObservation, Observation};

use crate::collaborators::ThermoCalculator;

/// Inches of mercury per hectopascal.
pub const INHG_PER_HPA: f64 = 0.0295300;

/// Hectopascals per inch of mercury.
pub const HPA_PER_INHG: f64 = 33.8639;

/// Meters per second per knot.
pub const MS_PER_KT: f64 = 0.514444;

/// Sky-cover okta code used when the fraction is unreported.
pub const OCTAS_MISSING: u8 = 10;

/// Convert Celsius to Fahrenheit.
pub fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Convert knots to meters per second.
pub fn knots_to_ms(kt: f64) -> f64 {
    kt * MS_PER_KT
}

/// Recover station pressure (hPa) from sea-level pressure and elevation.
///
/// The standard barometric altitude correction, inverted: sea-level pressure
/// is taken down to the station's actual elevation. Elevation NaN yields
/// NaN, not an error.
pub fn station_pressure_hpa(slp_hpa: f64, elevation_m: f64) -> f64 {
    let p_inhg = slp_hpa * INHG_PER_HPA;
    let sp_inhg = p_inhg * ((288.0 - 0.0065 * elevation_m) / 288.0).powf(5.2561);
    sp_inhg * HPA_PER_INHG
}

/// Actual vapor pressure (hPa): the saturation form evaluated at the
/// dewpoint.
pub fn vapor_pressure_hpa(dewpoint_c: f64) -> f64 {
    0.6112 * (17.67 * dewpoint_c / (dewpoint_c + 243.5)).exp() * 10.0
}

/// Water vapor mixing ratio in g/kg.
///
/// Deliberately unguarded when station pressure falls at or below the vapor
/// pressure (corrupt input): the negative or infinite result flows through,
/// and the rendering layer treats out-of-range values as suspect.
pub fn mixing_ratio_g_per_kg(dewpoint_c: f64, slp_hpa: f64, elevation_m: f64) -> f64 {
    let e_hpa = vapor_pressure_hpa(dewpoint_c);
    let p_station = station_pressure_hpa(slp_hpa, elevation_m);
    1000.0 * e_hpa / (p_station - e_hpa)
}

/// Wind components from speed and meteorological direction.
///
/// Direction is "from"; components point "to", hence the negations.
/// NaN in either input propagates to both outputs.
pub fn wind_components(speed_kt: f64, dir_deg: f64) -> (f64, f64) {
    let dir_rad = dir_deg.to_radians();
    (-speed_kt * dir_rad.sin(), -speed_kt * dir_rad.cos())
}

/// Sky cover fraction (0.0-1.0) to oktas (0-8); NaN maps to the missing
/// symbol code 10.
pub fn sky_cover_octas(fraction: f64) -> u8 {
    if fraction.is_nan() {
        return OCTAS_MISSING;
    }
    (fraction * 8.0).round().clamp(0.0, 8.0) as u8
}

/// Build the derived record for a QC-passed observation.
///
/// Theta-E comes from the external thermodynamic collaborator when one is
/// configured; otherwise it stays NaN.
pub fn derive(obs: Observation, thermo: Option<&dyn ThermoCalculator>) -> DerivedObservation {
    let temperature_f = c_to_f(obs.temperature_c);
    let dewpoint_f = c_to_f(obs.dewpoint_c);
    let station_pressure = station_pressure_hpa(obs.sea_level_pressure_hpa, obs.elevation_m);
    let mixing_ratio =
        mixing_ratio_g_per_kg(obs.dewpoint_c, obs.sea_level_pressure_hpa, obs.elevation_m);
    let (wind_u_kt, wind_v_kt) = wind_components(obs.wind_speed_kt, obs.wind_dir_deg);
    let sky_octas = sky_cover_octas(obs.sky_fraction);

    let theta_e = match thermo {
        Some(calc) => calc.theta_e_k(obs.temperature_c, obs.dewpoint_c, station_pressure),
        None => f64::NAN,
    };

    DerivedObservation {
        observation: obs,
        temperature_f,
        dewpoint_f,
        station_pressure_hpa: station_pressure,
        mixing_ratio_g_per_kg: mixing_ratio,
        equivalent_potential_temperature_k: theta_e,
        wind_u_kt,
        wind_v_kt,
        sky_cover_octas: sky_octas,
    }
}
