//! Surface Observation Analysis Core
//!
//! Turns a batch of decoded surface-station observations into analysis-ready
//! derived fields plus per-domain projection metadata, then hands scattered
//! points off to an external interpolation collaborator. All heavy externals
//! (METAR decoding, Cressman gridding, map rendering, file I/O) live outside
//! this crate behind the collaborator traits.
//!
//! # Pipeline
//!
//! ```text
//! Vec<Observation>
//!      │
//!      ▼
//! Orchestrator::run (per domain, per field)
//!      │
//!      ├─► Domain registry: derive projection from bounding box
//!      │
//!      ├─► QC filter: spatial + plausibility + field completeness
//!      │
//!      ├─► Derived fields: °F, station pressure, mixing ratio, u/v
//!      │
//!      └─► Delegate (x, y, value) points to the Interpolator
//!               │
//!               ▼
//!          BatchReport (per-pair outcomes, partial failure is normal)
//! ```
//!
//! The weather-type interval extractor runs independently of the gridding
//! path, classifying a chronological present-weather stream into shading
//! intervals for time-series plots.

pub mod collaborators;
pub mod config;
pub mod derive;
pub mod error;
pub mod field;
pub mod orchestrator;
pub mod qc;
pub mod wx;

pub use collaborators::{GridField, Interpolator, ScatterPoint, ThermoCalculator};
pub use config::{AnalysisConfig, DomainSpec, InterpMethod, InterpolationParams};
pub use error::{AnalysisError, Result};
pub use field::AnalysisField;
pub use orchestrator::{
    BatchReport, DomainReport, FieldOutcome, Orchestrator, PassState, PassStatus, StationExtremes,
};
pub use wx::{extract_intervals, WeatherInterval, WxCategory};
