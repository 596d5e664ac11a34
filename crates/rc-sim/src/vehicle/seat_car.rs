//! Quarter car with a suspended seat on top of the sprung mass.

use super::{QuarterCar, ensure_non_negative, ensure_positive, to_map};
use crate::error::SimResult;
use crate::model::{Dynamics, ParamMap, VehicleKind, param};
use crate::road::RoadProfile;

/// Three masses: seat on sprung mass on unsprung mass.
///
/// State: `[z_seat, z_seat_dot, z_s, z_s_dot, z_u, z_u_dot]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatAddedQuarterCar {
    /// Seat (plus occupant) mass [kg]
    pub m_seat: f64,
    /// Seat stiffness [N/m]
    pub k_seat: f64,
    /// Seat damping [N s/m]
    pub c_seat: f64,
    /// Quarter car beneath the seat.
    pub base: QuarterCar,
}

impl Default for SeatAddedQuarterCar {
    fn default() -> Self {
        Self {
            m_seat: 35.0,
            k_seat: 1_000.0,
            c_seat: 500.0,
            base: QuarterCar::default(),
        }
    }
}

const LABELS: &[&str] = &["z_seat", "z_seat_dot", "z_s", "z_s_dot", "z_u", "z_u_dot"];

impl SeatAddedQuarterCar {
    pub fn from_params(params: &ParamMap) -> SimResult<Self> {
        let owner = VehicleKind::SeatAddedQuarterCar.as_str();
        Ok(Self {
            m_seat: param(params, owner, "m_seat")?,
            k_seat: param(params, owner, "k_seat")?,
            c_seat: param(params, owner, "c_seat")?,
            base: QuarterCar {
                ms: param(params, owner, "ms")?,
                mu: param(params, owner, "mu")?,
                ks: param(params, owner, "ks")?,
                cs: param(params, owner, "cs")?,
                ku: param(params, owner, "ku")?,
            },
        })
    }

    pub fn params(&self) -> ParamMap {
        let mut map = self.base.params();
        map.extend(to_map(&[
            ("m_seat", self.m_seat),
            ("k_seat", self.k_seat),
            ("c_seat", self.c_seat),
        ]));
        map
    }

    pub fn validate(&self) -> SimResult<()> {
        let kind = VehicleKind::SeatAddedQuarterCar;
        ensure_positive(kind, "ms", self.base.ms)?;
        ensure_positive(kind, "mu", self.base.mu)?;
        ensure_positive(kind, "ks", self.base.ks)?;
        ensure_positive(kind, "ku", self.base.ku)?;
        ensure_non_negative(kind, "cs", self.base.cs)?;
        ensure_positive(kind, "m_seat", self.m_seat)?;
        ensure_positive(kind, "k_seat", self.k_seat)?;
        ensure_non_negative(kind, "c_seat", self.c_seat)
    }
}

impl Dynamics for SeatAddedQuarterCar {
    fn dof(&self) -> usize {
        3
    }

    fn state_labels(&self) -> &'static [&'static str] {
        LABELS
    }

    fn derivative(&self, t: f64, y: &[f64], road: &RoadProfile, dydt: &mut [f64]) {
        let (z_seat, v_seat) = (y[0], y[1]);
        let (z_s, v_s) = (y[2], y[3]);

        // Force of the seat mount on the seat; the body feels the reaction.
        let f_seat = -self.k_seat * (z_seat - z_s) - self.c_seat * (v_seat - v_s);
        let (a_s, a_u) = self.base.accelerations(&y[2..6], road.displacement(t), -f_seat);

        dydt[0] = v_seat;
        dydt[1] = f_seat / self.m_seat;
        dydt[2] = v_s;
        dydt[3] = a_s;
        dydt[4] = y[5];
        dydt[5] = a_u;
    }
}
