//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors that can occur during analysis orchestration.
///
/// NaN values and individually malformed observations are deliberately not
/// errors: records with unusable positions are dropped during QC and NaN
/// flows to the collaborators as a valid terminal value.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A domain's bounding box is unusable. Fatal for that domain only.
    #[error("invalid domain '{name}': {message}")]
    InvalidDomain { name: String, message: String },

    /// The weather-code and timestamp sequences are not index-aligned.
    #[error("mismatched series lengths: {codes} codes vs {timestamps} timestamps")]
    MismatchedSeries { codes: usize, timestamps: usize },

    /// An external collaborator (interpolation, thermodynamics) failed.
    /// Surfaced per (domain, field) pair; siblings proceed.
    #[error("collaborator failure for {context}: {message}")]
    Collaborator { context: String, message: String },

    /// The collaborator returned a grid whose dimensions do not match its
    /// data length.
    #[error("grid shape mismatch for {context}: {width}x{height} != {len} values")]
    GridShape {
        context: String,
        width: usize,
        height: usize,
        len: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Create a Collaborator error.
    pub fn collaborator(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<projection::DomainError> for AnalysisError {
    fn from(err: projection::DomainError) -> Self {
        match err {
            projection::DomainError::InvalidDomain { name, message } => {
                Self::InvalidDomain { name, message }
            }
            projection::DomainError::DuplicateName(name) => Self::InvalidDomain {
                name: name.clone(),
                message: format!("duplicate domain name: {name}"),
            },
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
