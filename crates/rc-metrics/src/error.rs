use rc_core::CoreError;
use rc_sim::SimError;
use thiserror::Error;

pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Malformed trajectory: {what}")]
    MalformedTrajectory { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<SimError> for MetricsError {
    fn from(err: SimError) -> Self {
        MetricsError::MalformedTrajectory {
            what: err.to_string(),
        }
    }
}
