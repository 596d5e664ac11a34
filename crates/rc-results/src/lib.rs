//! rc-results: named analysis records and their JSON persistence.

pub mod collection;
pub mod record;

pub use collection::AnalysisCollection;
pub use record::*;

use rc_metrics::MetricsError;
use rc_sim::SimError;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record: {what}")]
    MalformedRecord { what: String },

    #[error("Analysis not found: {name}")]
    NotFound { name: String },

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
