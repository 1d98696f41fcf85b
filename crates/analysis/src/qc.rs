//! Observation quality control.
//!
//! Three independent predicates applied in order; an observation failing any
//! one is dropped whole (no partial masking). Result ordering carries no
//! meaning and duplicate station ids are kept: distinct reports from the
//! same site at different valid times are legitimate in aggregate files.

use tracing::debug;

use obs_common::Observation;
use projection::Domain;

use crate::derive::c_to_f;
use crate::field::AnalysisField;

/// Warmest plausible surface temperature, °F. A report above this is a
/// known decoder artifact, not weather.
pub const MAX_TEMPERATURE_F: f64 = 120.0;

/// Highest plausible surface dewpoint, °F.
pub const MAX_DEWPOINT_F: f64 = 80.0;

/// Spatial predicate: inside the domain box expanded by the padding.
///
/// Non-finite lat/lon can never satisfy the containment test, so malformed
/// positions drop out here without a dedicated error path.
fn passes_spatial(obs: &Observation, domain: &Domain, padding_deg: f64) -> bool {
    domain.bbox.expand(padding_deg).contains(obs.lon, obs.lat)
}

/// Physical plausibility predicate. The thresholds are fixed constants,
/// not per-domain settings. NaN temperatures pass (missing is not
/// implausible); the boundary itself is retained (`<=`, not `<`).
fn passes_plausibility(obs: &Observation) -> bool {
    !(c_to_f(obs.temperature_c) > MAX_TEMPERATURE_F) && !(c_to_f(obs.dewpoint_c) > MAX_DEWPOINT_F)
}

/// Filter a batch down to spatially in-domain, physically plausible reports.
pub fn filter(observations: &[Observation], domain: &Domain, padding_deg: f64) -> Vec<Observation> {
    let total = observations.len();
    let kept: Vec<Observation> = observations
        .iter()
        .filter(|obs| passes_spatial(obs, domain, padding_deg) && passes_plausibility(obs))
        .cloned()
        .collect();

    debug!(
        domain = %domain.name,
        total,
        kept = kept.len(),
        dropped = total - kept.len(),
        "qc filter"
    );

    kept
}

/// Filter for a specific field: the base filter plus the field's
/// completeness sub-filter.
pub fn filter_for_field(
    observations: &[Observation],
    domain: &Domain,
    padding_deg: f64,
    field: AnalysisField,
) -> Vec<Observation> {
    let base = filter(observations, domain, padding_deg);
    let before = base.len();
    let kept: Vec<Observation> = base
        .into_iter()
        .filter(|obs| field.inputs_present(obs))
        .collect();

    debug!(
        domain = %domain.name,
        field = %field,
        dropped_incomplete = before - kept.len(),
        "field completeness filter"
    );

    kept
}
