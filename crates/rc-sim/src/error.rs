//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or integrating a ride model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Unsupported road profile: {tag}")]
    UnsupportedProfile { tag: String },

    #[error("Unsupported vehicle model: {tag}")]
    UnsupportedModel { tag: String },

    #[error("Invalid parameters: {what}")]
    InvalidParameters { what: String },

    #[error("Malformed trajectory: {what}")]
    MalformedTrajectory { what: String },

    #[error("Invalid time span or grid: {what}")]
    InvalidSpan { what: &'static str },

    #[error("Integration failed at t = {t}: {reason}")]
    IntegrationFailed { t: f64, reason: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<rc_core::CoreError> for SimError {
    fn from(e: rc_core::CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
