//! Error type for the command-line front end.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),
}

pub type CliResult<T> = Result<T, CliError>;

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Scenario(err.to_string())
    }
}

impl From<rc_sim::SimError> for CliError {
    fn from(err: rc_sim::SimError) -> Self {
        CliError::Simulation(err.to_string())
    }
}

impl From<rc_metrics::MetricsError> for CliError {
    fn from(err: rc_metrics::MetricsError) -> Self {
        CliError::Metrics(err.to_string())
    }
}

impl From<rc_results::ResultsError> for CliError {
    fn from(err: rc_results::ResultsError) -> Self {
        match err {
            rc_results::ResultsError::NotFound { name } => CliError::AnalysisNotFound(name),
            other => CliError::Results(other.to_string()),
        }
    }
}
