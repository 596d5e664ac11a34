//! Comfort metric extraction.
//!
//! Accelerations are not part of the state, so they are recovered by
//! differentiating each velocity row against the sample times. The result is
//! sensitive to grid density: a finer grid sharpens acceleration peaks and
//! also amplifies differentiation noise.
//!
//! Peaks are maximum absolute values, so a large downward excursion counts
//! the same as an upward one in every channel.

use rc_core::units::rad_to_deg;
use rc_core::{gradient, peak_abs, peak_to_peak, rms};
use rc_sim::{Trajectory, VehicleKind};
use serde::{Deserialize, Serialize};

use crate::error::MetricsResult;

/// Statistics of one (displacement, velocity) state pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub peak_displacement: f64,
    pub peak_velocity: f64,
    pub peak_acceleration: f64,
    pub rms_acceleration: f64,
    pub displacement_range: f64,
}

impl ChannelMetrics {
    /// Compute statistics for one channel sampled on `t`.
    pub fn from_series(
        displacement: &[f64],
        velocity: &[f64],
        t: &[f64],
    ) -> MetricsResult<Self> {
        let acceleration = gradient(velocity, t)?;
        Ok(Self {
            peak_displacement: peak_abs(displacement),
            peak_velocity: peak_abs(velocity),
            peak_acceleration: peak_abs(&acceleration),
            rms_acceleration: rms(&acceleration),
            displacement_range: peak_to_peak(displacement),
        })
    }

    /// Same statistics with the displacement-derived values converted from
    /// radians to degrees. Rates stay in radians.
    fn with_angle_in_degrees(self) -> Self {
        Self {
            peak_displacement: rad_to_deg(self.peak_displacement),
            displacement_range: rad_to_deg(self.displacement_range),
            ..self
        }
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("peak_displacement", self.peak_displacement),
            ("peak_velocity", self.peak_velocity),
            ("peak_acceleration", self.peak_acceleration),
            ("rms_acceleration", self.rms_acceleration),
            ("displacement_range", self.displacement_range),
        ]
    }
}

/// Whether a channel is a vertical translation or the body pitch rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    /// m, m/s, m/s²
    Linear,
    /// deg, rad/s, rad/s²
    Angular,
}

/// A labelled view of one channel, in display order.
#[derive(Clone, Copy, Debug)]
pub struct Channel<'a> {
    pub key: &'static str,
    pub label: &'static str,
    pub quantity: Quantity,
    pub metrics: &'a ChannelMetrics,
}

/// Comfort indices for one run, shaped by the vehicle variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComfortMetrics {
    QuarterCar {
        sprung: ChannelMetrics,
        unsprung: ChannelMetrics,
    },
    SeatAddedQuarterCar {
        seat: ChannelMetrics,
        sprung: ChannelMetrics,
        unsprung: ChannelMetrics,
    },
    HalfCar {
        body: ChannelMetrics,
        /// Angle values in degrees, rates in radians.
        pitch: ChannelMetrics,
        front: ChannelMetrics,
        rear: ChannelMetrics,
    },
}

impl ComfortMetrics {
    pub fn kind(&self) -> VehicleKind {
        match self {
            ComfortMetrics::QuarterCar { .. } => VehicleKind::QuarterCar,
            ComfortMetrics::SeatAddedQuarterCar { .. } => VehicleKind::SeatAddedQuarterCar,
            ComfortMetrics::HalfCar { .. } => VehicleKind::HalfCar,
        }
    }

    pub fn channels(&self) -> Vec<Channel<'_>> {
        use Quantity::{Angular, Linear};
        let channel = |key, label, quantity, metrics| Channel {
            key,
            label,
            quantity,
            metrics,
        };
        match self {
            ComfortMetrics::QuarterCar { sprung, unsprung } => vec![
                channel("sprung", "Sprung Mass", Linear, sprung),
                channel("unsprung", "Unsprung Mass", Linear, unsprung),
            ],
            ComfortMetrics::SeatAddedQuarterCar {
                seat,
                sprung,
                unsprung,
            } => vec![
                channel("seat", "Seat", Linear, seat),
                channel("sprung", "Sprung Mass", Linear, sprung),
                channel("unsprung", "Unsprung Mass", Linear, unsprung),
            ],
            ComfortMetrics::HalfCar {
                body,
                pitch,
                front,
                rear,
            } => vec![
                channel("body", "Body Bounce", Linear, body),
                channel("pitch", "Body Pitch", Angular, pitch),
                channel("front", "Front Unsprung Mass", Linear, front),
                channel("rear", "Rear Unsprung Mass", Linear, rear),
            ],
        }
    }

    /// Flat `channel.statistic` view of every value.
    pub fn fields(&self) -> Vec<(String, f64)> {
        self.channels()
            .iter()
            .flat_map(|c| {
                c.metrics
                    .fields()
                    .into_iter()
                    .map(move |(name, value)| (format!("{}.{name}", c.key), value))
            })
            .collect()
    }

    /// Look up one value by its `channel.statistic` name.
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields()
            .into_iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }
}

/// Derive comfort indices from a completed trajectory.
///
/// The trajectory is only checked for shape; non-finite samples flow
/// through to the result.
pub fn compute_metrics(traj: &Trajectory) -> MetricsResult<ComfortMetrics> {
    traj.check_shape()?;
    let pair =
        |k: usize| ChannelMetrics::from_series(traj.row(2 * k), traj.row(2 * k + 1), &traj.t);

    let metrics = match traj.kind {
        VehicleKind::QuarterCar => ComfortMetrics::QuarterCar {
            sprung: pair(0)?,
            unsprung: pair(1)?,
        },
        VehicleKind::SeatAddedQuarterCar => ComfortMetrics::SeatAddedQuarterCar {
            seat: pair(0)?,
            sprung: pair(1)?,
            unsprung: pair(2)?,
        },
        VehicleKind::HalfCar => ComfortMetrics::HalfCar {
            body: pair(0)?,
            pitch: pair(1)?.with_angle_in_degrees(),
            front: pair(2)?,
            rear: pair(3)?,
        },
    };

    tracing::debug!(model = %traj.kind, samples = traj.len(), "metrics computed");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_sim::SolverStats;

    fn trajectory(kind: VehicleKind, t: Vec<f64>, y: Vec<Vec<f64>>) -> Trajectory {
        let n = t.len();
        Trajectory {
            kind,
            t,
            y,
            road: vec![0.0; n],
            road_rear: (kind == VehicleKind::HalfCar).then(|| vec![0.0; n]),
            stats: SolverStats::default(),
        }
    }

    #[test]
    fn constant_acceleration_channel() {
        // z = t^2, v = 2t, a = 2
        let t = rc_core::linspace(0.0, 1.0, 11);
        let z: Vec<f64> = t.iter().map(|t| t * t).collect();
        let v: Vec<f64> = t.iter().map(|t| 2.0 * t).collect();
        let m = ChannelMetrics::from_series(&z, &v, &t).unwrap();
        assert!((m.peak_acceleration - 2.0).abs() < 1e-12);
        assert!((m.rms_acceleration - 2.0).abs() < 1e-12);
        assert_eq!(m.peak_velocity, 2.0);
        assert_eq!(m.peak_displacement, 1.0);
        assert_eq!(m.displacement_range, 1.0);
    }

    #[test]
    fn peaks_are_absolute() {
        let t = vec![0.0, 1.0, 2.0];
        let z = vec![0.0, -0.3, 0.1];
        let v = vec![0.0, -2.0, 1.0];
        let m = ChannelMetrics::from_series(&z, &v, &t).unwrap();
        assert_eq!(m.peak_displacement, 0.3);
        assert_eq!(m.peak_velocity, 2.0);
        assert!((m.displacement_range - 0.4).abs() < 1e-15);
    }

    #[test]
    fn quarter_car_rows_map_to_masses() {
        let t = vec![0.0, 1.0, 2.0];
        let y = vec![
            vec![0.0, 0.1, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.5, 0.0],
            vec![0.0, 0.0, 0.0],
        ];
        let metrics = compute_metrics(&trajectory(VehicleKind::QuarterCar, t, y)).unwrap();
        assert_eq!(metrics.kind(), VehicleKind::QuarterCar);
        assert_eq!(metrics.field("sprung.peak_displacement"), Some(0.1));
        assert_eq!(metrics.field("unsprung.peak_displacement"), Some(0.5));
        assert_eq!(metrics.fields().len(), 10);
        assert_eq!(metrics.field("seat.peak_displacement"), None);
    }

    #[test]
    fn half_car_pitch_angle_in_degrees_rates_in_radians() {
        let t = vec![0.0, 1.0, 2.0];
        let quarter_turn = std::f64::consts::FRAC_PI_2;
        let mut y = vec![vec![0.0; 3]; 8];
        y[2] = vec![0.0, quarter_turn, 0.0];
        y[3] = vec![0.0, 1.0, 0.0];
        let metrics = compute_metrics(&trajectory(VehicleKind::HalfCar, t, y)).unwrap();
        let ComfortMetrics::HalfCar { pitch, .. } = metrics else {
            panic!("expected half car metrics");
        };
        assert!((pitch.peak_displacement - 90.0).abs() < 1e-12);
        assert!((pitch.displacement_range - 90.0).abs() < 1e-12);
        assert_eq!(pitch.peak_velocity, 1.0);
    }

    #[test]
    fn seat_car_has_three_channels() {
        let t = vec![0.0, 1.0];
        let y = vec![vec![0.0; 2]; 6];
        let metrics =
            compute_metrics(&trajectory(VehicleKind::SeatAddedQuarterCar, t, y)).unwrap();
        let keys: Vec<&str> = metrics.channels().iter().map(|c| c.key).collect();
        assert_eq!(keys, ["seat", "sprung", "unsprung"]);
    }

    #[test]
    fn wrong_row_count_is_malformed() {
        let t = vec![0.0, 1.0];
        let y = vec![vec![0.0; 2]; 4];
        let err = compute_metrics(&trajectory(VehicleKind::HalfCar, t, y)).unwrap_err();
        assert!(matches!(err, crate::MetricsError::MalformedTrajectory { .. }));
    }

    #[test]
    fn non_finite_samples_propagate() {
        let t = vec![0.0, 1.0, 2.0];
        let y = vec![
            vec![0.0, f64::NAN, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0; 3],
            vec![0.0, f64::INFINITY, 0.0],
        ];
        let metrics = compute_metrics(&trajectory(VehicleKind::QuarterCar, t, y)).unwrap();
        let sprung_disp = metrics.field("sprung.peak_displacement").unwrap();
        let unsprung_acc = metrics.field("unsprung.peak_acceleration").unwrap();
        assert!(sprung_disp.is_nan());
        assert!(!unsprung_acc.is_finite());
    }
}
