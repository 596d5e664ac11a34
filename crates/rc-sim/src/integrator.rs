//! Adaptive explicit Runge-Kutta integration.
//!
//! [`Rk45`] is the Dormand-Prince 5(4) pair: the 5th-order solution is
//! propagated, the embedded 4th-order solution drives step-size control, and
//! a 4th-order continuous extension places output on the caller's grid
//! without constraining the internal steps.

use nalgebra::{DMatrix, DVector};
use rc_core::EngineConfig;

use crate::error::{SimError, SimResult};

/// Counters gathered over one integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
}

/// States sampled on the requested evaluation grid.
#[derive(Clone, Debug)]
pub struct DenseSolution {
    pub t: Vec<f64>,
    pub y: Vec<DVector<f64>>,
    pub stats: SolverStats,
}

/// Trait for time integrators that sample onto a caller-supplied grid.
pub trait Integrator {
    /// Integrate `dy/dt = rhs(t, y)` over `t_span` from `y0`, returning the
    /// state at every point of `t_eval` (increasing, inside `t_span`).
    fn integrate<F>(
        &self,
        rhs: F,
        t_span: (f64, f64),
        y0: &DVector<f64>,
        t_eval: &[f64],
    ) -> SimResult<DenseSolution>
    where
        F: FnMut(f64, &DVector<f64>, &mut DVector<f64>);
}

/// Dormand-Prince 5(4) with dense output.
#[derive(Clone, Debug)]
pub struct Rk45 {
    pub rtol: f64,
    pub atol: f64,
    /// Attempted steps (accepted + rejected) before giving up.
    pub max_steps: usize,
}

impl Default for Rk45 {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
/// `-1 / (embedded order + 1)`
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];

const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Difference between the 5th and embedded 4th order weights (FSAL stage last).
const E: [f64; 7] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

/// Continuous extension: coefficients of `x, x^2, x^3, x^4` per stage.
const P: [[f64; 4]; 7] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

/// Root-mean-square norm.
fn rms_norm(v: &DVector<f64>) -> f64 {
    v.norm() / (v.len() as f64).sqrt()
}

impl Rk45 {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            rtol: config.solver_rtol,
            atol: config.solver_atol,
            max_steps: config.max_steps,
        }
    }

    fn failed(t: f64, reason: impl Into<String>) -> SimError {
        let reason = reason.into();
        tracing::warn!(t, %reason, "integration failed");
        SimError::IntegrationFailed { t, reason }
    }

    /// Starting step from the size of the state, its slope and its curvature
    /// (Hairer, Norsett & Wanner, section II.4).
    fn initial_step<F>(
        &self,
        rhs: &mut F,
        t0: f64,
        t1: f64,
        y0: &DVector<f64>,
        f0: &DVector<f64>,
        stats: &mut SolverStats,
    ) -> f64
    where
        F: FnMut(f64, &DVector<f64>, &mut DVector<f64>),
    {
        let interval = (t1 - t0).abs();
        if y0.is_empty() || interval == 0.0 {
            return interval;
        }

        let scale = y0.map(|v| self.atol + v.abs() * self.rtol);
        let d0 = rms_norm(&y0.component_div(&scale));
        let d1 = rms_norm(&f0.component_div(&scale));

        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        }
        .min(interval);

        let y1 = y0 + f0 * h0;
        let mut f1 = DVector::zeros(y0.len());
        rhs(t0 + h0, &y1, &mut f1);
        stats.rhs_evals += 1;

        let d2 = rms_norm(&(&f1 - f0).component_div(&scale)) / h0;
        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 5.0)
        };

        (100.0 * h0).min(h1).min(interval)
    }

    /// One Dormand-Prince step of size `h`. Fills all seven stages in `k`,
    /// the last being the slope at the new point.
    fn rk_step<F>(
        rhs: &mut F,
        t: f64,
        y: &DVector<f64>,
        f: &DVector<f64>,
        h: f64,
        k: &mut [DVector<f64>],
    ) -> DVector<f64>
    where
        F: FnMut(f64, &DVector<f64>, &mut DVector<f64>),
    {
        k[0].copy_from(f);
        for s in 1..6 {
            let mut ys = y.clone();
            for j in 0..s {
                ys.axpy(A[s][j] * h, &k[j], 1.0);
            }
            rhs(t + C[s] * h, &ys, &mut k[s]);
        }

        let mut y_new = y.clone();
        for (j, b) in B.iter().enumerate() {
            y_new.axpy(h * b, &k[j], 1.0);
        }
        rhs(t + h, &y_new, &mut k[6]);
        y_new
    }

    fn error_norm(
        &self,
        k: &[DVector<f64>],
        h: f64,
        y: &DVector<f64>,
        y_new: &DVector<f64>,
    ) -> f64 {
        let mut err = DVector::zeros(y.len());
        for (j, e) in E.iter().enumerate() {
            err.axpy(h * e, &k[j], 1.0);
        }
        let scaled = DVector::from_fn(y.len(), |i, _| {
            err[i] / (self.atol + y[i].abs().max(y_new[i].abs()) * self.rtol)
        });
        rms_norm(&scaled)
    }
}

/// Interpolant over one accepted step.
struct StepInterpolant<'a> {
    t_old: f64,
    h: f64,
    y_old: &'a DVector<f64>,
    q: DMatrix<f64>,
}

impl<'a> StepInterpolant<'a> {
    fn new(t_old: f64, h: f64, y_old: &'a DVector<f64>, k: &[DVector<f64>]) -> Self {
        let stages = DMatrix::from_columns(k);
        let p = DMatrix::from_fn(7, 4, |r, c| P[r][c]);
        Self {
            t_old,
            h,
            y_old,
            q: stages * p,
        }
    }

    fn eval(&self, t: f64) -> DVector<f64> {
        let x = (t - self.t_old) / self.h;
        let powers = DVector::from_vec(vec![x, x * x, x * x * x, x * x * x * x]);
        self.y_old + (&self.q * powers) * self.h
    }
}

impl Integrator for Rk45 {
    fn integrate<F>(
        &self,
        mut rhs: F,
        t_span: (f64, f64),
        y0: &DVector<f64>,
        t_eval: &[f64],
    ) -> SimResult<DenseSolution>
    where
        F: FnMut(f64, &DVector<f64>, &mut DVector<f64>),
    {
        let (t0, t1) = t_span;
        let n = y0.len();
        let mut stats = SolverStats::default();

        let mut t = t0;
        let mut y = y0.clone();
        let mut f = DVector::zeros(n);
        rhs(t, &y, &mut f);
        stats.rhs_evals += 1;

        let mut h_abs = self.initial_step(&mut rhs, t0, t1, &y, &f, &mut stats);
        let mut k = vec![DVector::zeros(n); 7];

        let mut out_t = Vec::with_capacity(t_eval.len());
        let mut out_y = Vec::with_capacity(t_eval.len());
        let mut next = 0;
        let mut attempts = 0_usize;

        while t < t1 {
            // Ten ulps of the current time is the smallest meaningful step.
            let min_step = 10.0 * (t.next_up() - t);
            h_abs = h_abs.max(min_step);

            let mut rejected = false;
            let (t_new, h, y_new) = loop {
                if h_abs < min_step {
                    return Err(Self::failed(
                        t,
                        "required step size is below floating-point resolution",
                    ));
                }
                attempts += 1;
                if attempts > self.max_steps {
                    return Err(Self::failed(
                        t,
                        format!("exceeded {} attempted steps", self.max_steps),
                    ));
                }

                let t_new = (t + h_abs).min(t1);
                let h = t_new - t;
                h_abs = h;

                let y_new = Self::rk_step(&mut rhs, t, &y, &f, h, &mut k);
                stats.rhs_evals += 6;
                let error_norm = self.error_norm(&k, h, &y, &y_new);

                if error_norm < 1.0 {
                    let mut factor = if error_norm == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * error_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                    };
                    if rejected {
                        factor = factor.min(1.0);
                    }
                    h_abs *= factor;
                    stats.accepted_steps += 1;
                    break (t_new, h, y_new);
                }

                // NaN error norms shrink by MIN_FACTOR until the step is too small.
                h_abs *= (SAFETY * error_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR);
                rejected = true;
                stats.rejected_steps += 1;
            };

            if y_new.iter().any(|v| !v.is_finite()) {
                return Err(Self::failed(t_new, "state diverged to a non-finite value"));
            }

            if next < t_eval.len() && t_eval[next] <= t_new {
                let interp = StepInterpolant::new(t, h, &y, &k);
                while next < t_eval.len() && t_eval[next] <= t_new {
                    out_t.push(t_eval[next]);
                    out_y.push(interp.eval(t_eval[next]));
                    next += 1;
                }
            }

            t = t_new;
            y = y_new;
            f.copy_from(&k[6]);
        }

        Ok(DenseSolution {
            t: out_t,
            y: out_y,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight() -> Rk45 {
        Rk45 {
            rtol: 1e-9,
            atol: 1e-12,
            max_steps: 1_000_000,
        }
    }

    #[test]
    fn exponential_decay_matches_closed_form() {
        let grid: Vec<f64> = (0..=20).map(|i| i as f64 * 0.25).collect();
        let y0 = DVector::from_vec(vec![1.0]);
        let sol = tight()
            .integrate(|_t, y, dydt| dydt[0] = -y[0], (0.0, 5.0), &y0, &grid)
            .unwrap();
        assert_eq!(sol.t, grid);
        for (t, y) in sol.t.iter().zip(&sol.y) {
            assert!((y[0] - (-t).exp()).abs() < 1e-7, "t={t}: {}", y[0]);
        }
    }

    #[test]
    fn oscillator_dense_output_tracks_cosine() {
        let period = 2.0 * std::f64::consts::PI;
        let grid = rc_core::linspace(0.0, period, 157);
        let y0 = DVector::from_vec(vec![1.0, 0.0]);
        let sol = tight()
            .integrate(
                |_t, y, dydt| {
                    dydt[0] = y[1];
                    dydt[1] = -y[0];
                },
                (0.0, period),
                &y0,
                &grid,
            )
            .unwrap();
        assert_eq!(sol.y.len(), grid.len());
        for (t, y) in sol.t.iter().zip(&sol.y) {
            assert!((y[0] - t.cos()).abs() < 1e-6);
            assert!((y[1] + t.sin()).abs() < 1e-6);
        }
    }

    #[test]
    fn output_grid_does_not_drive_step_count() {
        let grid = rc_core::linspace(0.0, 10.0, 2000);
        let y0 = DVector::from_vec(vec![1.0, 0.0]);
        let sol = Rk45::default()
            .integrate(
                |_t, y, dydt| {
                    dydt[0] = y[1];
                    dydt[1] = -y[0];
                },
                (0.0, 10.0),
                &y0,
                &grid,
            )
            .unwrap();
        assert_eq!(sol.t.len(), 2000);
        assert!(sol.stats.accepted_steps < 500, "{:?}", sol.stats);
    }

    #[test]
    fn first_sample_is_initial_state() {
        let y0 = DVector::from_vec(vec![0.3, -0.2]);
        let sol = Rk45::default()
            .integrate(
                |_t, y, dydt| {
                    dydt[0] = y[1];
                    dydt[1] = -4.0 * y[0];
                },
                (0.0, 1.0),
                &y0,
                &[0.0, 0.5, 1.0],
            )
            .unwrap();
        assert_eq!(sol.y[0], y0);
    }

    #[test]
    fn repeated_runs_are_bitwise_identical() {
        let grid = rc_core::linspace(0.0, 3.0, 301);
        let y0 = DVector::from_vec(vec![1.0, 0.0]);
        let run = || {
            Rk45::default()
                .integrate(
                    |t, y, dydt| {
                        dydt[0] = y[1];
                        dydt[1] = -10.0 * y[0] - 0.5 * y[1] + (3.0 * t).sin();
                    },
                    (0.0, 3.0),
                    &y0,
                    &grid,
                )
                .unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.t, b.t);
        assert_eq!(a.y, b.y);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn blow_up_reports_last_time_reached() {
        // y' = y^2, y(0) = 1 has a pole at t = 1.
        let y0 = DVector::from_vec(vec![1.0]);
        let err = Rk45::default()
            .integrate(|_t, y, dydt| dydt[0] = y[0] * y[0], (0.0, 2.0), &y0, &[0.0, 2.0])
            .unwrap_err();
        match err {
            SimError::IntegrationFailed { t, .. } => assert!(t > 0.9 && t <= 1.0 + 1e-6, "t={t}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn step_budget_is_enforced() {
        let solver = Rk45 {
            max_steps: 3,
            ..tight()
        };
        let y0 = DVector::from_vec(vec![1.0, 0.0]);
        let err = solver
            .integrate(
                |_t, y, dydt| {
                    dydt[0] = y[1];
                    dydt[1] = -y[0];
                },
                (0.0, 100.0),
                &y0,
                &[100.0],
            )
            .unwrap_err();
        assert!(matches!(err, SimError::IntegrationFailed { .. }));
    }
}
