//! Analysis orchestration across (domain, field) pairs.
//!
//! Each pair walks a fixed state machine:
//! `Pending → Projected → Filtered → Derived → Delegated`.
//! A failure finalizes that pair with the state it reached and a reason;
//! sibling fields and domains always proceed. There is no retry state:
//! retries are the caller's policy.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use obs_common::{BoundingBox, DerivedObservation, Observation};
use projection::{Domain, LambertConformal};

use crate::collaborators::{GridField, Interpolator, ScatterPoint, ThermoCalculator};
use crate::config::{AnalysisConfig, InterpolationParams};
use crate::derive;
use crate::error::{AnalysisError, Result};
use crate::field::AnalysisField;
use crate::qc;

/// States of one (domain, field) pass. `Delegated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassState {
    Pending,
    Projected,
    Filtered,
    Derived,
    Delegated,
}

impl std::fmt::Display for PassState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Projected => "projected",
            Self::Filtered => "filtered",
            Self::Derived => "derived",
            Self::Delegated => "delegated",
        };
        write!(f, "{s}")
    }
}

/// Terminal status of one (domain, field) pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PassStatus {
    /// Points were handed to the interpolation collaborator and a
    /// well-shaped grid came back.
    Delegated {
        /// Scattered points delegated (after NaN-value removal).
        points: usize,
        /// Grids produced (2 for vector wind, 1 otherwise).
        grids: usize,
        /// Fraction of returned cells left NaN (under-constrained).
        nan_fraction: f64,
    },
    /// The pass stopped at `state` for the given reason.
    Failed { state: PassState, reason: String },
}

/// Outcome of one (domain, field) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub domain: String,
    pub field: AnalysisField,
    pub status: PassStatus,
}

impl FieldOutcome {
    /// True when the pair reached the terminal Delegated state.
    pub fn is_delegated(&self) -> bool {
        matches!(self.status, PassStatus::Delegated { .. })
    }
}

/// Station extremes within a domain's unpadded bounds, for the rendering
/// collaborator's annotation box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationExtremes {
    /// Station id and temperature (°F) of the coldest report.
    pub coldest: (String, f64),
    /// Station id and temperature (°F) of the warmest report.
    pub warmest: (String, f64),
    /// Station id and dewpoint (°F) of the moistest report.
    pub max_dewpoint: (String, f64),
}

/// Per-domain bookkeeping for a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainReport {
    pub name: String,
    /// Observations surviving base QC (spatial + plausibility).
    pub observations_kept: usize,
    /// Full QC+derivation sweeps performed for this domain. 1 when the
    /// derived cache is reused across fields, 1 + field count otherwise.
    pub derivation_passes: usize,
    pub extremes: Option<StationExtremes>,
}

/// Result of one multi-domain batch. Partial success is the expected shape:
/// some pairs delegated, some failed, never whole-batch failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<FieldOutcome>,
    pub domains: Vec<DomainReport>,
}

impl BatchReport {
    /// Count of pairs that reached Delegated.
    pub fn delegated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delegated()).count()
    }

    /// Iterate over failed pairs.
    pub fn failures(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.outcomes.iter().filter(|o| !o.is_delegated())
    }

    /// Serialize the report for logs or downstream consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Composes the domain registry, QC filter, derived-field calculator, and
/// collaborators into per-batch analysis runs.
///
/// Owns no state between batches; the per-domain derived cache lives only
/// for the duration of one `run` call.
pub struct Orchestrator<'a> {
    config: AnalysisConfig,
    interpolator: &'a dyn Interpolator,
    thermo: Option<&'a dyn ThermoCalculator>,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator with a validated configuration.
    pub fn new(config: AnalysisConfig, interpolator: &'a dyn Interpolator) -> Result<Self> {
        config.validate().map_err(AnalysisError::Config)?;
        Ok(Self {
            config,
            interpolator,
            thermo: None,
        })
    }

    /// Attach an external thermodynamic collaborator for theta-E.
    pub fn with_thermo(mut self, thermo: &'a dyn ThermoCalculator) -> Self {
        self.thermo = Some(thermo);
        self
    }

    /// Run one batch over all configured (domain, field) pairs.
    pub fn run(&self, observations: &[Observation]) -> BatchReport {
        let mut report = BatchReport::default();

        for spec in &self.config.domains {
            match Domain::from_bbox(&spec.name, spec.bbox()) {
                Ok(domain) => self.run_domain(&domain, observations, &mut report),
                Err(err) => {
                    // Fatal for this domain only; siblings proceed.
                    let err = AnalysisError::from(err);
                    warn!(domain = %spec.name, error = %err, "domain rejected");
                    for field in &self.config.fields {
                        report.outcomes.push(FieldOutcome {
                            domain: spec.name.clone(),
                            field: *field,
                            status: PassStatus::Failed {
                                state: PassState::Pending,
                                reason: err.to_string(),
                            },
                        });
                    }
                    report.domains.push(DomainReport {
                        name: spec.name.clone(),
                        observations_kept: 0,
                        derivation_passes: 0,
                        extremes: None,
                    });
                }
            }
        }

        info!(
            pairs = report.outcomes.len(),
            delegated = report.delegated_count(),
            "batch complete"
        );
        report
    }

    fn run_domain(&self, domain: &Domain, observations: &[Observation], report: &mut BatchReport) {
        let transform = domain.transform();
        let padding = self.config.padding_deg;

        // Base sweep: QC + derivation for the whole domain. Always needed
        // for the extremes summary; reused across field passes when
        // restart_domain is set.
        let base: Vec<DerivedObservation> = qc::filter(observations, domain, padding)
            .into_iter()
            .map(|obs| derive::derive(obs, self.thermo))
            .collect();
        let mut derivation_passes = 1;
        let observations_kept = base.len();

        for field in &self.config.fields {
            let derived: Vec<DerivedObservation> = if self.config.restart_domain {
                // Cache reuse: wind and pressure derivations are
                // domain-invariant across scalar passes.
                base.iter()
                    .filter(|d| field.inputs_present(&d.observation))
                    .cloned()
                    .collect()
            } else {
                derivation_passes += 1;
                qc::filter_for_field(observations, domain, padding, *field)
                    .into_iter()
                    .map(|obs| derive::derive(obs, self.thermo))
                    .collect()
            };

            let status = self.delegate(domain, *field, &derived, &transform);
            match &status {
                PassStatus::Delegated { points, grids, .. } => {
                    info!(domain = %domain.name, field = %field, points, grids, "delegated");
                }
                PassStatus::Failed { state, reason } => {
                    warn!(domain = %domain.name, field = %field, %state, reason = %reason, "pass failed");
                }
            }
            report.outcomes.push(FieldOutcome {
                domain: domain.name.clone(),
                field: *field,
                status,
            });
        }

        let extremes = station_extremes(&base, &domain.bbox);
        report.domains.push(DomainReport {
            name: domain.name.clone(),
            observations_kept,
            derivation_passes,
            extremes,
        });
    }

    /// `Derived → Delegated` transition for one field.
    fn delegate(
        &self,
        domain: &Domain,
        field: AnalysisField,
        derived: &[DerivedObservation],
        transform: &LambertConformal,
    ) -> PassStatus {
        let params = self
            .config
            .interpolation
            .unwrap_or_else(|| field.default_interpolation());
        let context = format!("{}/{}", domain.name, field);

        if field == AnalysisField::Wind {
            // Vector wind grids the u and v components separately over the
            // same point locations.
            let u_points = scatter_points(derived, transform, |d| d.wind_u_kt);
            let v_points = scatter_points(derived, transform, |d| d.wind_v_kt);

            let u_grid = match self.interpolate(&context, &u_points, &params) {
                Ok(grid) => grid,
                Err(status) => return status,
            };
            let v_grid = match self.interpolate(&context, &v_points, &params) {
                Ok(grid) => grid,
                Err(status) => return status,
            };

            return PassStatus::Delegated {
                points: u_points.len(),
                grids: 2,
                nan_fraction: (u_grid.nan_fraction() + v_grid.nan_fraction()) / 2.0,
            };
        }

        let points = scatter_points(derived, transform, |d| field.scalar_value(d));
        match self.interpolate(&context, &points, &params) {
            Ok(grid) => PassStatus::Delegated {
                points: points.len(),
                grids: 1,
                nan_fraction: grid.nan_fraction(),
            },
            Err(status) => status,
        }
    }

    /// Call the collaborator and apply shape bookkeeping. The returned grid
    /// is otherwise uninspected.
    fn interpolate(
        &self,
        context: &str,
        points: &[ScatterPoint],
        params: &InterpolationParams,
    ) -> std::result::Result<GridField, PassStatus> {
        match self.interpolator.interpolate(points, params) {
            Ok(grid) if grid.shape_consistent() => Ok(grid),
            Ok(grid) => Err(PassStatus::Failed {
                state: PassState::Derived,
                reason: AnalysisError::GridShape {
                    context: context.to_string(),
                    width: grid.width,
                    height: grid.height,
                    len: grid.values.len(),
                }
                .to_string(),
            }),
            Err(err) => Err(PassStatus::Failed {
                state: PassState::Derived,
                reason: AnalysisError::collaborator(context, format!("{err:#}")).to_string(),
            }),
        }
    }
}

/// Project derived observations into scattered points, dropping NaN values.
///
/// QC guarantees finite positions; the value extractor may still produce
/// NaN (missing input for this field after cache reuse), which is removed
/// here rather than handed to the interpolator. Projected coordinates that
/// come back non-finite are dropped the same way.
fn scatter_points<F>(
    derived: &[DerivedObservation],
    transform: &LambertConformal,
    value: F,
) -> Vec<ScatterPoint>
where
    F: Fn(&DerivedObservation) -> f64,
{
    let mut points = Vec::with_capacity(derived.len());
    for d in derived {
        let v = value(d);
        if v.is_nan() {
            continue;
        }
        let (x, y) = transform.forward(d.observation.lat, d.observation.lon);
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        points.push(ScatterPoint { x, y, value: v });
    }
    debug!(
        input = derived.len(),
        points = points.len(),
        "projected scatter points"
    );
    points
}

/// Find the coldest/warmest temperature and highest dewpoint stations
/// within the unpadded domain bounds.
///
/// Returns None when no report inside the bounds has both a usable
/// temperature and a usable dewpoint somewhere in the set.
pub fn station_extremes(
    derived: &[DerivedObservation],
    bbox: &BoundingBox,
) -> Option<StationExtremes> {
    let in_bounds = derived
        .iter()
        .filter(|d| bbox.contains(d.observation.lon, d.observation.lat));

    let mut coldest: Option<(&str, f64)> = None;
    let mut warmest: Option<(&str, f64)> = None;
    let mut moistest: Option<(&str, f64)> = None;

    for d in in_bounds {
        let id = d.observation.station_id.as_str();
        if d.temperature_f.is_finite() {
            if coldest.map_or(true, |(_, t)| d.temperature_f < t) {
                coldest = Some((id, d.temperature_f));
            }
            if warmest.map_or(true, |(_, t)| d.temperature_f > t) {
                warmest = Some((id, d.temperature_f));
            }
        }
        if d.dewpoint_f.is_finite() && moistest.map_or(true, |(_, td)| d.dewpoint_f > td) {
            moistest = Some((id, d.dewpoint_f));
        }
    }

    match (coldest, warmest, moistest) {
        (Some(c), Some(w), Some(m)) => Some(StationExtremes {
            coldest: (c.0.to_string(), c.1),
            warmest: (w.0.to_string(), w.1),
            max_dewpoint: (m.0.to_string(), m.1),
        }),
        _ => None,
    }
}
