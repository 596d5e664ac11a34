//! Explicit engine configuration.
//!
//! Passed by value to whichever stage needs it; nothing here is global.

use crate::{CoreError, CoreResult, Real, ensure_finite};

/// Largest grid [`EngineConfig::default_grid`] will build.
pub const MAX_GRID_SAMPLES: usize = 50_000_000;

/// Solver tolerances and grid defaults for a simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Relative local error tolerance of the adaptive integrator.
    pub solver_rtol: Real,
    /// Absolute local error tolerance of the adaptive integrator.
    pub solver_atol: Real,
    /// Samples per simulated second for grids built by [`EngineConfig::default_grid`].
    pub default_grid_density: Real,
    /// Hard cap on attempted integrator steps (accepted + rejected).
    pub max_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            solver_rtol: 1e-3,
            solver_atol: 1e-6,
            default_grid_density: 1000.0,
            max_steps: 10_000_000,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.solver_rtol.is_finite() && self.solver_rtol > 0.0) {
            return Err(CoreError::InvalidArg {
                what: "solver_rtol must be positive and finite",
            });
        }
        if !(self.solver_atol.is_finite() && self.solver_atol > 0.0) {
            return Err(CoreError::InvalidArg {
                what: "solver_atol must be positive and finite",
            });
        }
        if !(self.default_grid_density.is_finite() && self.default_grid_density > 0.0) {
            return Err(CoreError::InvalidArg {
                what: "default_grid_density must be positive and finite",
            });
        }
        if self.max_steps == 0 {
            return Err(CoreError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }

    /// Uniform grid over `[t0, t1]` at `default_grid_density`, endpoints included.
    ///
    /// Fails rather than allocate more than [`MAX_GRID_SAMPLES`] points.
    pub fn default_grid(&self, t0: Real, t1: Real) -> CoreResult<Vec<Real>> {
        let span = (ensure_finite(t1, "t1")? - ensure_finite(t0, "t0")?).max(0.0);
        let intervals = (span * self.default_grid_density).round();
        if !(intervals < MAX_GRID_SAMPLES as Real) {
            return Err(CoreError::InvalidArg {
                what: "default grid would exceed MAX_GRID_SAMPLES",
            });
        }
        let n = intervals as usize + 1;
        Ok(crate::linspace(t0, t1, n.max(2)))
    }
}

/// Decimal places used when metrics are rendered as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReportFormat {
    pub displacement: usize,
    pub velocity: usize,
    pub acceleration: usize,
    pub angle: usize,
    pub time: usize,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            displacement: 4,
            velocity: 3,
            acceleration: 2,
            angle: 3,
            time: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.solver_rtol, 1e-3);
        assert_eq!(cfg.solver_atol, 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn engine_config_rejects_bad_tolerance() {
        let cfg = EngineConfig {
            solver_rtol: 0.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = EngineConfig {
            solver_atol: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_grid_covers_span() {
        let cfg = EngineConfig::default();
        let grid = cfg.default_grid(0.0, 3.0).unwrap();
        assert_eq!(grid.len(), 3001);
        assert_eq!(grid[0], 0.0);
        assert_eq!(*grid.last().unwrap(), 3.0);
    }

    #[test]
    fn default_grid_rejects_huge_span() {
        let cfg = EngineConfig::default();
        assert!(matches!(
            cfg.default_grid(0.0, 1e300),
            Err(CoreError::InvalidArg { .. })
        ));
        assert!(matches!(
            cfg.default_grid(0.0, f64::INFINITY),
            Err(CoreError::NonFinite { what: "t1", .. })
        ));
        // Just under the cap still builds.
        let span = (MAX_GRID_SAMPLES - 2) as f64 / cfg.default_grid_density;
        assert!(cfg.default_grid(0.0, span).is_ok());
    }
}
