//! rc-core: shared foundation for the ride-comfort workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + series helpers used by the metrics stage)
//! - units (uom conversions at the reporting boundary)
//! - config (explicit engine configuration, no globals)
//! - error (shared error types)

pub mod config;
pub mod error;
pub mod numeric;
pub mod units;

pub use config::{EngineConfig, MAX_GRID_SAMPLES, ReportFormat};
pub use error::{CoreError, CoreResult};
pub use numeric::*;
