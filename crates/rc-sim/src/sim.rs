//! Simulation runner and trajectory recording.

use nalgebra::DVector;
use rayon::prelude::*;
use rc_core::EngineConfig;

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, Rk45, SolverStats};
use crate::model::{Dynamics, VehicleKind, VehicleModel};
use crate::road::RoadProfile;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Integration interval `(t0, t1)` in seconds.
    pub t_span: (f64, f64),
    /// Output grid, increasing, inside `t_span`.
    pub t_eval: Vec<f64>,
    /// Solver tolerances and limits.
    pub config: EngineConfig,
}

impl SimOptions {
    /// Uniform grid of `samples` points over the span.
    pub fn uniform(t0: f64, t1: f64, samples: usize) -> Self {
        Self {
            t_span: (t0, t1),
            t_eval: rc_core::linspace(t0, t1, samples),
            config: EngineConfig::default(),
        }
    }

    /// Grid at the configured default density.
    pub fn with_default_grid(t0: f64, t1: f64, config: EngineConfig) -> SimResult<Self> {
        Ok(Self {
            t_span: (t0, t1),
            t_eval: config.default_grid(t0, t1)?,
            config,
        })
    }

    pub fn validate(&self) -> SimResult<()> {
        let (t0, t1) = self.t_span;
        if !(t0.is_finite() && t1.is_finite()) {
            return Err(SimError::InvalidSpan {
                what: "t_span must be finite",
            });
        }
        if t1 <= t0 {
            return Err(SimError::InvalidSpan {
                what: "t_span end must be after its start",
            });
        }
        if self.t_eval.is_empty() {
            return Err(SimError::InvalidSpan {
                what: "t_eval must not be empty",
            });
        }
        if self.t_eval.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SimError::InvalidSpan {
                what: "t_eval must be strictly increasing",
            });
        }
        let first = self.t_eval[0];
        let last = self.t_eval[self.t_eval.len() - 1];
        if !(first >= t0 && last <= t1) {
            return Err(SimError::InvalidSpan {
                what: "t_eval must lie inside t_span",
            });
        }
        self.config.validate()?;
        Ok(())
    }
}

/// Sampled response of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub kind: VehicleKind,
    /// Sample times (seconds)
    pub t: Vec<f64>,
    /// One row per state component, one column per sample.
    pub y: Vec<Vec<f64>>,
    /// Road displacement under the (front) tyre at each sample.
    pub road: Vec<f64>,
    /// Road displacement under the rear tyre, for two-axle models.
    pub road_rear: Option<Vec<f64>>,
    pub stats: SolverStats,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn n_states(&self) -> usize {
        self.y.len()
    }

    /// Time series of one state component.
    pub fn row(&self, index: usize) -> &[f64] {
        &self.y[index]
    }

    /// Check the shape invariants: one row per state component and one
    /// column per sample in every row and excitation series.
    pub fn check_shape(&self) -> SimResult<()> {
        let n = self.t.len();
        if self.y.len() != 2 * self.kind.dof() {
            return Err(SimError::MalformedTrajectory {
                what: format!(
                    "{}: expected {} state rows, got {}",
                    self.kind,
                    2 * self.kind.dof(),
                    self.y.len()
                ),
            });
        }
        let columns_match = self.y.iter().all(|row| row.len() == n)
            && self.road.len() == n
            && self.road_rear.as_ref().is_none_or(|r| r.len() == n);
        if !columns_match {
            return Err(SimError::MalformedTrajectory {
                what: format!("{}: series lengths differ from t ({n})", self.kind),
            });
        }
        Ok(())
    }
}

/// Integrate `model` driven by `road` and sample it on `opts.t_eval`.
pub fn run_sim(
    model: &VehicleModel,
    road: &RoadProfile,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    opts.validate()?;
    road.validate()?;

    let kind = model.kind();
    tracing::debug!(
        model = %kind,
        road = road.tag(),
        t0 = opts.t_span.0,
        t1 = opts.t_span.1,
        samples = opts.t_eval.len(),
        "starting run"
    );

    let solver = Rk45::from_config(&opts.config);
    let y0 = DVector::from_column_slice(model.initial_state());
    let solution = solver.integrate(
        |t, y, dydt| model.derivative(t, y.as_slice(), road, dydt.as_mut_slice()),
        opts.t_span,
        &y0,
        &opts.t_eval,
    )?;

    tracing::debug!(
        model = %kind,
        accepted = solution.stats.accepted_steps,
        rejected = solution.stats.rejected_steps,
        rhs_evals = solution.stats.rhs_evals,
        "run finished"
    );

    // Transpose samples into one row per state component.
    let n_states = model.state_len();
    let mut y = vec![Vec::with_capacity(solution.t.len()); n_states];
    for sample in &solution.y {
        for (row, value) in y.iter_mut().zip(sample.iter()) {
            row.push(*value);
        }
    }

    // Excitation re-evaluated on the output grid, not the internal steps.
    let road_front = road.sample(&solution.t);
    let road_rear = model
        .rear_axle_delay()
        .map(|delay| road.sample_delayed(&solution.t, delay));

    Ok(Trajectory {
        kind,
        t: solution.t,
        y,
        road: road_front,
        road_rear,
        stats: solution.stats,
    })
}

/// A named, self-contained run request.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: String,
    pub model: VehicleModel,
    pub road: RoadProfile,
    pub options: SimOptions,
}

impl Scenario {
    pub fn run(&self) -> SimResult<Trajectory> {
        run_sim(&self.model, &self.road, &self.options)
    }
}

/// Run independent scenarios in parallel. Results come back in input order;
/// one failed run does not affect the others.
pub fn run_batch(scenarios: &[Scenario]) -> Vec<SimResult<Trajectory>> {
    tracing::info!(count = scenarios.len(), "running batch");
    scenarios
        .par_iter()
        .map(|scenario| {
            let result = scenario.run();
            if let Err(e) = &result {
                tracing::warn!(scenario = %scenario.name, error = %e, "scenario failed");
            }
            result
        })
        .collect()
}
