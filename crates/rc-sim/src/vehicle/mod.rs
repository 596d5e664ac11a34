//! Vehicle variants and their equations of motion.
//!
//! All suspension and tyre elements are linear: `F = k * dx + c * dv`.

mod half_car;
mod quarter_car;
mod seat_car;

pub use half_car::HalfCar;
pub use quarter_car::QuarterCar;
pub use seat_car::SeatAddedQuarterCar;

use crate::error::{SimError, SimResult};
use crate::model::{Dynamics, ParamMap, VehicleKind};
use crate::road::RoadProfile;

/// Physical constants of one vehicle variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Vehicle {
    QuarterCar(QuarterCar),
    SeatAddedQuarterCar(SeatAddedQuarterCar),
    HalfCar(HalfCar),
}

impl Vehicle {
    pub fn kind(&self) -> VehicleKind {
        match self {
            Vehicle::QuarterCar(_) => VehicleKind::QuarterCar,
            Vehicle::SeatAddedQuarterCar(_) => VehicleKind::SeatAddedQuarterCar,
            Vehicle::HalfCar(_) => VehicleKind::HalfCar,
        }
    }

    pub fn from_params(kind: VehicleKind, params: &ParamMap) -> SimResult<Self> {
        let vehicle = match kind {
            VehicleKind::QuarterCar => Vehicle::QuarterCar(QuarterCar::from_params(params)?),
            VehicleKind::SeatAddedQuarterCar => {
                Vehicle::SeatAddedQuarterCar(SeatAddedQuarterCar::from_params(params)?)
            }
            VehicleKind::HalfCar => Vehicle::HalfCar(HalfCar::from_params(params)?),
        };
        vehicle.validate()?;
        Ok(vehicle)
    }

    /// Variant defaults.
    pub fn default_for(kind: VehicleKind) -> Self {
        match kind {
            VehicleKind::QuarterCar => Vehicle::QuarterCar(QuarterCar::default()),
            VehicleKind::SeatAddedQuarterCar => {
                Vehicle::SeatAddedQuarterCar(SeatAddedQuarterCar::default())
            }
            VehicleKind::HalfCar => Vehicle::HalfCar(HalfCar::default()),
        }
    }

    pub fn params(&self) -> ParamMap {
        match self {
            Vehicle::QuarterCar(v) => v.params(),
            Vehicle::SeatAddedQuarterCar(v) => v.params(),
            Vehicle::HalfCar(v) => v.params(),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        match self {
            Vehicle::QuarterCar(v) => v.validate(),
            Vehicle::SeatAddedQuarterCar(v) => v.validate(),
            Vehicle::HalfCar(v) => v.validate(),
        }
    }
}

impl Dynamics for Vehicle {
    fn dof(&self) -> usize {
        match self {
            Vehicle::QuarterCar(v) => v.dof(),
            Vehicle::SeatAddedQuarterCar(v) => v.dof(),
            Vehicle::HalfCar(v) => v.dof(),
        }
    }

    fn state_labels(&self) -> &'static [&'static str] {
        match self {
            Vehicle::QuarterCar(v) => v.state_labels(),
            Vehicle::SeatAddedQuarterCar(v) => v.state_labels(),
            Vehicle::HalfCar(v) => v.state_labels(),
        }
    }

    fn derivative(&self, t: f64, y: &[f64], road: &RoadProfile, dydt: &mut [f64]) {
        match self {
            Vehicle::QuarterCar(v) => v.derivative(t, y, road, dydt),
            Vehicle::SeatAddedQuarterCar(v) => v.derivative(t, y, road, dydt),
            Vehicle::HalfCar(v) => v.derivative(t, y, road, dydt),
        }
    }

    fn rear_axle_delay(&self) -> Option<f64> {
        match self {
            Vehicle::QuarterCar(v) => v.rear_axle_delay(),
            Vehicle::SeatAddedQuarterCar(v) => v.rear_axle_delay(),
            Vehicle::HalfCar(v) => v.rear_axle_delay(),
        }
    }
}

/// Reject non-positive masses, stiffnesses and similar.
pub(crate) fn ensure_positive(owner: VehicleKind, name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameters {
            what: format!("{owner}: '{name}' must be positive, got {value}"),
        })
    }
}

/// Reject negative damping coefficients and distances.
pub(crate) fn ensure_non_negative(owner: VehicleKind, name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameters {
            what: format!("{owner}: '{name}' must be non-negative, got {value}"),
        })
    }
}

pub(crate) fn to_map(pairs: &[(&str, f64)]) -> ParamMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
