//! Road excitation profiles.
//!
//! Every profile is a pure function of time, so it can be sampled at the
//! integrator's trial times (which are not monotonic across rejected steps)
//! and again on the output grid.

use std::f64::consts::PI;

use crate::error::{SimError, SimResult};
use crate::model::{ParamMap, param};

/// Prescribed vertical road displacement under the tyre.
#[derive(Clone, Debug, PartialEq)]
pub enum RoadProfile {
    /// `amplitude * sin(2 pi f t)`.
    Sinusoidal { amplitude: f64, frequency: f64 },
    /// `amplitude` from `activation_time` onwards (inclusive), zero before.
    Step { amplitude: f64, activation_time: f64 },
    /// Linear sweep from `initial_frequency` to `final_frequency` over `end_time`.
    Chirp {
        amplitude: f64,
        initial_frequency: f64,
        final_frequency: f64,
        end_time: f64,
    },
}

impl RoadProfile {
    pub const SINUSOIDAL: &'static str = "sinusoidal";
    pub const STEP: &'static str = "step";
    pub const CHIRP: &'static str = "chirp";

    /// Build a profile from its record tag and named parameters.
    pub fn from_params(tag: &str, params: &ParamMap) -> SimResult<Self> {
        let profile = match tag {
            Self::SINUSOIDAL => RoadProfile::Sinusoidal {
                amplitude: param(params, tag, "amplitude")?,
                frequency: param(params, tag, "frequency")?,
            },
            Self::STEP => RoadProfile::Step {
                amplitude: param(params, tag, "amplitude")?,
                activation_time: param(params, tag, "activation_time")?,
            },
            Self::CHIRP => RoadProfile::Chirp {
                amplitude: param(params, tag, "amplitude")?,
                initial_frequency: param(params, tag, "initial_frequency")?,
                final_frequency: param(params, tag, "final_frequency")?,
                end_time: param(params, tag, "end_time")?,
            },
            other => {
                return Err(SimError::UnsupportedProfile {
                    tag: other.to_string(),
                });
            }
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> SimResult<()> {
        if let RoadProfile::Chirp { end_time, .. } = self
            && *end_time <= 0.0
        {
            return Err(SimError::InvalidParameters {
                what: "chirp end_time must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn tag(&self) -> &'static str {
        match self {
            RoadProfile::Sinusoidal { .. } => Self::SINUSOIDAL,
            RoadProfile::Step { .. } => Self::STEP,
            RoadProfile::Chirp { .. } => Self::CHIRP,
        }
    }

    /// Named parameters in record form, the inverse of [`RoadProfile::from_params`].
    pub fn params(&self) -> ParamMap {
        let pairs: Vec<(&str, f64)> = match *self {
            RoadProfile::Sinusoidal {
                amplitude,
                frequency,
            } => vec![("amplitude", amplitude), ("frequency", frequency)],
            RoadProfile::Step {
                amplitude,
                activation_time,
            } => vec![("amplitude", amplitude), ("activation_time", activation_time)],
            RoadProfile::Chirp {
                amplitude,
                initial_frequency,
                final_frequency,
                end_time,
            } => vec![
                ("amplitude", amplitude),
                ("initial_frequency", initial_frequency),
                ("final_frequency", final_frequency),
                ("end_time", end_time),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Road displacement at time `t`.
    pub fn displacement(&self, t: f64) -> f64 {
        match *self {
            RoadProfile::Sinusoidal {
                amplitude,
                frequency,
            } => amplitude * (2.0 * PI * frequency * t).sin(),
            RoadProfile::Step {
                amplitude,
                activation_time,
            } => {
                if t >= activation_time {
                    amplitude
                } else {
                    0.0
                }
            }
            RoadProfile::Chirp {
                amplitude,
                initial_frequency,
                final_frequency,
                end_time,
            } => {
                // Closed-form phase integral of a linear frequency ramp.
                let sweep = (final_frequency - initial_frequency) / (2.0 * end_time);
                amplitude * (2.0 * PI * (initial_frequency + sweep * t) * t).sin()
            }
        }
    }

    /// Displacement seen by an axle that reaches the same road point `delay`
    /// seconds later. Before the axle arrives it sees the road at `t = 0`.
    pub fn delayed_displacement(&self, t: f64, delay: f64) -> f64 {
        self.displacement((t - delay).max(0.0))
    }

    /// Sample the profile over a grid.
    pub fn sample(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&t| self.displacement(t)).collect()
    }

    /// Sample the delayed profile over a grid.
    pub fn sample_delayed(&self, grid: &[f64], delay: f64) -> Vec<f64> {
        grid.iter()
            .map(|&t| self.delayed_displacement(t, delay))
            .collect()
    }
}
