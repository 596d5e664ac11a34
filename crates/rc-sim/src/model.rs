//! Dynamics trait and the run-scoped vehicle model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};
use crate::road::RoadProfile;
use crate::vehicle::Vehicle;

/// Named physical constants as they appear in analysis records.
pub type ParamMap = BTreeMap<String, f64>;

/// Look up a required, finite parameter.
pub(crate) fn param(params: &ParamMap, owner: &str, key: &str) -> SimResult<f64> {
    let value = params
        .get(key)
        .copied()
        .ok_or_else(|| SimError::InvalidParameters {
            what: format!("{owner}: missing '{key}'"),
        })?;
    if !value.is_finite() {
        return Err(SimError::InvalidParameters {
            what: format!("{owner}: '{key}' is not finite ({value})"),
        });
    }
    Ok(value)
}

/// Linear state-space equations of motion for one vehicle variant.
///
/// A Dynamics implementation must:
/// - Report its degree-of-freedom count; the state holds `2 * dof` entries
///   as (displacement, velocity) pairs in [`Dynamics::state_labels`] order
/// - Write `dy/dt` into `dydt` with the same layout, so that
///   `dydt[2k] == y[2k + 1]` for every pair `k`
pub trait Dynamics {
    /// Number of independent displacement coordinates.
    fn dof(&self) -> usize;

    /// State component names, in canonical order.
    fn state_labels(&self) -> &'static [&'static str];

    /// Evaluate `dy/dt` at time `t`.
    fn derivative(&self, t: f64, y: &[f64], road: &RoadProfile, dydt: &mut [f64]);

    /// Lag of the rear axle's road input behind the front one, for variants
    /// with a second axle.
    fn rear_axle_delay(&self) -> Option<f64> {
        None
    }

    fn state_len(&self) -> usize {
        2 * self.dof()
    }
}

/// Vehicle variant tag, used for record typing and metric selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    QuarterCar,
    SeatAddedQuarterCar,
    HalfCar,
}

impl VehicleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::QuarterCar => "QuarterCarModel",
            VehicleKind::SeatAddedQuarterCar => "SeatAddedQuarterCarModel",
            VehicleKind::HalfCar => "HalfCarModel",
        }
    }

    pub fn dof(self) -> usize {
        match self {
            VehicleKind::QuarterCar => 2,
            VehicleKind::SeatAddedQuarterCar => 3,
            VehicleKind::HalfCar => 4,
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QuarterCarModel" | "quarter_car" => Ok(VehicleKind::QuarterCar),
            "SeatAddedQuarterCarModel" | "seat_added_quarter_car" => {
                Ok(VehicleKind::SeatAddedQuarterCar)
            }
            "HalfCarModel" | "half_car" => Ok(VehicleKind::HalfCar),
            other => Err(SimError::UnsupportedModel {
                tag: other.to_string(),
            }),
        }
    }
}

/// A vehicle bound to its initial state for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleModel {
    vehicle: Vehicle,
    initial_state: Vec<f64>,
}

impl VehicleModel {
    /// Bind validated constants to an initial state of matching length.
    pub fn new(vehicle: Vehicle, initial_state: Vec<f64>) -> SimResult<Self> {
        vehicle.validate()?;
        if initial_state.len() != vehicle.state_len() {
            return Err(SimError::InvalidParameters {
                what: format!(
                    "{}: expected {} initial conditions, got {}",
                    vehicle.kind(),
                    vehicle.state_len(),
                    initial_state.len()
                ),
            });
        }
        if initial_state.iter().any(|v| !v.is_finite()) {
            return Err(SimError::InvalidParameters {
                what: format!("{}: initial conditions must be finite", vehicle.kind()),
            });
        }
        Ok(Self {
            vehicle,
            initial_state,
        })
    }

    /// Model starting at rest.
    pub fn at_rest(vehicle: Vehicle) -> SimResult<Self> {
        let n = vehicle.state_len();
        Self::new(vehicle, vec![0.0; n])
    }

    /// Build from the record form: type tag, named parameters, initial conditions.
    /// An empty initial-condition list means "at rest".
    pub fn from_params(tag: &str, params: &ParamMap, initial_state: &[f64]) -> SimResult<Self> {
        let kind: VehicleKind = tag.parse()?;
        let vehicle = Vehicle::from_params(kind, params)?;
        if initial_state.is_empty() {
            Self::at_rest(vehicle)
        } else {
            Self::new(vehicle, initial_state.to_vec())
        }
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn kind(&self) -> VehicleKind {
        self.vehicle.kind()
    }

    pub fn initial_state(&self) -> &[f64] {
        &self.initial_state
    }
}

impl Dynamics for VehicleModel {
    fn dof(&self) -> usize {
        self.vehicle.dof()
    }

    fn state_labels(&self) -> &'static [&'static str] {
        self.vehicle.state_labels()
    }

    fn derivative(&self, t: f64, y: &[f64], road: &RoadProfile, dydt: &mut [f64]) {
        self.vehicle.derivative(t, y, road, dydt)
    }

    fn rear_axle_delay(&self) -> Option<f64> {
        self.vehicle.rear_axle_delay()
    }
}
