//! End-to-end orchestration tests with mock collaborators.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};

use analysis::{
    AnalysisConfig, AnalysisField, DomainSpec, GridField, Interpolator, InterpolationParams,
    Orchestrator, PassState, PassStatus, ScatterPoint, ThermoCalculator,
};
use obs_common::Observation;

/// Returns a small flat grid and records every call's parameters.
struct RecordingInterpolator {
    calls: RefCell<Vec<InterpolationParams>>,
}

impl RecordingInterpolator {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Interpolator for RecordingInterpolator {
    fn interpolate(
        &self,
        _points: &[ScatterPoint],
        params: &InterpolationParams,
    ) -> anyhow::Result<GridField> {
        self.calls.borrow_mut().push(*params);
        Ok(GridField {
            values: vec![1.0, f64::NAN, 1.0, 1.0],
            width: 2,
            height: 2,
        })
    }
}

/// Fails whenever the requested grid resolution matches `fail_resolution_m`.
struct SelectiveInterpolator {
    fail_resolution_m: f64,
}

impl Interpolator for SelectiveInterpolator {
    fn interpolate(
        &self,
        _points: &[ScatterPoint],
        params: &InterpolationParams,
    ) -> anyhow::Result<GridField> {
        if params.grid_resolution_m == self.fail_resolution_m {
            anyhow::bail!("search radius exhausted");
        }
        Ok(GridField {
            values: vec![0.0; 9],
            width: 3,
            height: 3,
        })
    }
}

/// Returns grids whose declared shape disagrees with the buffer.
struct MisshapenInterpolator;

impl Interpolator for MisshapenInterpolator {
    fn interpolate(
        &self,
        _points: &[ScatterPoint],
        _params: &InterpolationParams,
    ) -> anyhow::Result<GridField> {
        Ok(GridField {
            values: vec![0.0; 5],
            width: 2,
            height: 2,
        })
    }
}

/// Rejects any point with a non-finite coordinate before gridding.
struct FiniteCheckInterpolator;

impl Interpolator for FiniteCheckInterpolator {
    fn interpolate(
        &self,
        points: &[ScatterPoint],
        _params: &InterpolationParams,
    ) -> anyhow::Result<GridField> {
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                anyhow::bail!("non-finite coordinate ({}, {})", p.x, p.y);
            }
        }
        Ok(GridField {
            values: vec![0.0; 4],
            width: 2,
            height: 2,
        })
    }
}

struct FixedThermo;

impl ThermoCalculator for FixedThermo {
    fn theta_e_k(&self, temperature_c: f64, _dewpoint_c: f64, _pressure_hpa: f64) -> f64 {
        temperature_c + 273.15 + 20.0
    }
}

fn obs(id: &str, lat: f64, lon: f64, temp_c: f64, dewp_c: f64) -> Observation {
    Observation {
        station_id: id.to_string(),
        lat,
        lon,
        elevation_m: 200.0,
        sea_level_pressure_hpa: 1014.0,
        temperature_c: temp_c,
        dewpoint_c: dewp_c,
        sky_fraction: 0.5,
        present_weather: String::new(),
        wind_dir_deg: 180.0,
        wind_speed_kt: 10.0,
        valid_time: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
    }
}

fn texas_obs() -> Vec<Observation> {
    vec![
        obs("KDFW", 32.9, -97.0, 22.0, 14.0),
        obs("KAMA", 35.2, -101.7, 12.0, 2.0),
        obs("KHOU", 29.6, -95.3, 27.0, 21.0),
        // In the 2-degree QC padding but outside the unpadded box.
        obs("KOKC", 39.2, -97.6, 5.0, 1.0),
        // Far outside the domain entirely.
        obs("KSEA", 47.4, -122.3, 10.0, 8.0),
    ]
}

fn config(domains: Vec<DomainSpec>, fields: Vec<AnalysisField>) -> AnalysisConfig {
    AnalysisConfig {
        domains,
        fields,
        ..AnalysisConfig::default()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn batch_delegates_all_fields_for_valid_domain() {
    init_tracing();
    let interp = RecordingInterpolator::new();
    let cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        vec![
            AnalysisField::Temperature,
            AnalysisField::SeaLevelPressure,
            AnalysisField::Wind,
        ],
    );
    let orchestrator = Orchestrator::new(cfg, &interp).unwrap();
    let report = orchestrator.run(&texas_obs());

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.delegated_count(), 3);

    // Wind delegates two grids over one point set.
    let wind = report
        .outcomes
        .iter()
        .find(|o| o.field == AnalysisField::Wind)
        .unwrap();
    match &wind.status {
        PassStatus::Delegated { points, grids, .. } => {
            assert_eq!(*grids, 2);
            assert_eq!(*points, 4); // KSEA dropped by spatial QC
        }
        other => panic!("wind should delegate, got {other:?}"),
    }

    // Per-field interpolation defaults reached the collaborator: pressure
    // at 100 km with a single-neighbor floor, temperature at 35 km.
    let calls = interp.calls.borrow();
    assert_eq!(calls.len(), 4); // temp + slp + u + v
    assert!(calls
        .iter()
        .any(|p| p.grid_resolution_m == 100_000.0 && p.minimum_neighbors == 1));
    assert!(calls
        .iter()
        .any(|p| p.grid_resolution_m == 35_000.0 && p.minimum_neighbors == 3));
    drop(calls);

    // The report serializes cleanly for downstream consumers.
    let json = report.to_json().unwrap();
    assert!(json.contains("texas"));
}

#[test]
fn invalid_domain_fails_alone() {
    let interp = RecordingInterpolator::new();
    let cfg = config(
        vec![
            DomainSpec::new("backwards", -93.0, -108.0, 25.0, 38.0),
            DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0),
        ],
        vec![AnalysisField::Temperature],
    );
    let orchestrator = Orchestrator::new(cfg, &interp).unwrap();
    let report = orchestrator.run(&texas_obs());

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.delegated_count(), 1);

    let failed = report.failures().next().unwrap();
    assert_eq!(failed.domain, "backwards");
    match &failed.status {
        PassStatus::Failed { state, reason } => {
            assert_eq!(*state, PassState::Pending);
            assert!(reason.contains("invalid domain"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn equatorial_domain_delegates_finite_points() {
    // A box straddling the equator derives standard_parallel = 0; every
    // station must still project to finite map coordinates.
    let interp = FiniteCheckInterpolator;
    let cfg = config(
        vec![DomainSpec::new("guinea-gulf", -5.0, 15.0, -12.0, 12.0)],
        vec![AnalysisField::Temperature, AnalysisField::Wind],
    );
    let stations = vec![
        obs("DGAA", 5.6, -0.2, 29.0, 23.0),
        obs("FOOL", 0.5, 9.4, 28.0, 24.0),
        obs("DNMM", 6.6, 3.3, 30.0, 24.0),
    ];
    let report = Orchestrator::new(cfg, &interp).unwrap().run(&stations);

    assert_eq!(report.delegated_count(), 2, "failures: {:?}", report.failures().collect::<Vec<_>>());
    match &report.outcomes[0].status {
        PassStatus::Delegated { points, .. } => assert_eq!(*points, 3),
        other => panic!("expected delegation, got {other:?}"),
    }
}

#[test]
fn collaborator_failure_is_per_field() {
    // Temperature (35 km default) fails; pressure (100 km) succeeds.
    let interp = SelectiveInterpolator {
        fail_resolution_m: 35_000.0,
    };
    let cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        vec![AnalysisField::Temperature, AnalysisField::SeaLevelPressure],
    );
    let orchestrator = Orchestrator::new(cfg, &interp).unwrap();
    let report = orchestrator.run(&texas_obs());

    assert_eq!(report.delegated_count(), 1);
    let failed = report.failures().next().unwrap();
    assert_eq!(failed.field, AnalysisField::Temperature);
    match &failed.status {
        PassStatus::Failed { state, reason } => {
            assert_eq!(*state, PassState::Derived);
            assert!(reason.contains("search radius exhausted"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn misshapen_grid_is_rejected() {
    let interp = MisshapenInterpolator;
    let cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        vec![AnalysisField::Temperature],
    );
    let orchestrator = Orchestrator::new(cfg, &interp).unwrap();
    let report = orchestrator.run(&texas_obs());

    let failed = report.failures().next().unwrap();
    match &failed.status {
        PassStatus::Failed { reason, .. } => assert!(reason.contains("shape mismatch")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn derived_cache_reused_across_scalar_fields() {
    let interp = RecordingInterpolator::new();
    let fields = vec![AnalysisField::Temperature, AnalysisField::Dewpoint];

    let mut cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        fields.clone(),
    );
    cfg.restart_domain = true;
    let report = Orchestrator::new(cfg, &interp).unwrap().run(&texas_obs());
    assert_eq!(report.domains[0].derivation_passes, 1);

    let mut cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        fields,
    );
    cfg.restart_domain = false;
    let report2 = Orchestrator::new(cfg, &interp).unwrap().run(&texas_obs());
    // One base sweep for extremes plus one per field.
    assert_eq!(report2.domains[0].derivation_passes, 3);

    // The optimization never changes outcomes.
    assert_eq!(report.outcomes, report2.outcomes);
}

#[test]
fn extremes_exclude_padding_stations() {
    let interp = RecordingInterpolator::new();
    let cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        vec![AnalysisField::Temperature],
    );
    let report = Orchestrator::new(cfg, &interp).unwrap().run(&texas_obs());

    let domain = &report.domains[0];
    // Padding kept KOKC for gridding...
    assert_eq!(domain.observations_kept, 4);
    // ...but the extremes box only covers the unpadded domain, so the
    // coldest station is KAMA, not KOKC.
    let extremes = domain.extremes.as_ref().unwrap();
    assert_eq!(extremes.coldest.0, "KAMA");
    assert_eq!(extremes.warmest.0, "KHOU");
    assert_eq!(extremes.max_dewpoint.0, "KHOU");
}

#[test]
fn empty_batch_reports_no_extremes() {
    let interp = RecordingInterpolator::new();
    let cfg = config(
        vec![DomainSpec::new("texas", -108.0, -93.0, 25.0, 38.0)],
        vec![AnalysisField::Temperature],
    );
    let report = Orchestrator::new(cfg, &interp).unwrap().run(&[]);
    assert!(report.domains[0].extremes.is_none());
    // Zero points is still a delegation; the collaborator decides what an
    // empty analysis means.
    assert_eq!(report.delegated_count(), 1);
}

#[test]
fn thermo_collaborator_fills_theta_e() {
    let thermo = FixedThermo;
    let derived = analysis::derive::derive(obs("KDFW", 32.9, -97.0, 22.0, 14.0), Some(&thermo));
    assert!((derived.equivalent_potential_temperature_k - 315.15).abs() < 1e-9);

    let without = analysis::derive::derive(obs("KDFW", 32.9, -97.0, 22.0, 14.0), None);
    assert!(without.equivalent_potential_temperature_k.is_nan());
}
