//! rc-metrics: ride-comfort indices extracted from simulated trajectories.
//!
//! This crate provides:
//! - Per-mass channel statistics (peak displacement, velocity, acceleration,
//!   RMS acceleration, displacement range)
//! - A variant-specific [`ComfortMetrics`] value computed by a pure function
//! - Plain-text performance reports

pub mod comfort;
pub mod error;
pub mod report;

pub use comfort::{Channel, ChannelMetrics, ComfortMetrics, Quantity, compute_metrics};
pub use error::{MetricsError, MetricsResult};
pub use report::{ReportHeader, format_report};
