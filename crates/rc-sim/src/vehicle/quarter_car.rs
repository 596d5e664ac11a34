//! Two-mass quarter car.

use super::{ensure_non_negative, ensure_positive, to_map};
use crate::error::SimResult;
use crate::model::{Dynamics, ParamMap, VehicleKind, param};
use crate::road::RoadProfile;

/// Sprung and unsprung mass joined by a spring-damper, tyre as a pure spring.
///
/// State: `[z_s, z_s_dot, z_u, z_u_dot]`.
#[derive(Clone, Debug, PartialEq)]
pub struct QuarterCar {
    /// Sprung mass [kg]
    pub ms: f64,
    /// Unsprung mass [kg]
    pub mu: f64,
    /// Suspension stiffness [N/m]
    pub ks: f64,
    /// Suspension damping [N s/m]
    pub cs: f64,
    /// Tyre stiffness [N/m]
    pub ku: f64,
}

impl Default for QuarterCar {
    fn default() -> Self {
        Self {
            ms: 250.0,
            mu: 50.0,
            ks: 15_000.0,
            cs: 1_000.0,
            ku: 150_000.0,
        }
    }
}

const LABELS: &[&str] = &["z_s", "z_s_dot", "z_u", "z_u_dot"];

impl QuarterCar {
    pub fn from_params(params: &ParamMap) -> SimResult<Self> {
        let owner = VehicleKind::QuarterCar.as_str();
        Ok(Self {
            ms: param(params, owner, "ms")?,
            mu: param(params, owner, "mu")?,
            ks: param(params, owner, "ks")?,
            cs: param(params, owner, "cs")?,
            ku: param(params, owner, "ku")?,
        })
    }

    pub fn params(&self) -> ParamMap {
        to_map(&[
            ("ms", self.ms),
            ("mu", self.mu),
            ("ks", self.ks),
            ("cs", self.cs),
            ("ku", self.ku),
        ])
    }

    pub fn validate(&self) -> SimResult<()> {
        let kind = VehicleKind::QuarterCar;
        ensure_positive(kind, "ms", self.ms)?;
        ensure_positive(kind, "mu", self.mu)?;
        ensure_positive(kind, "ks", self.ks)?;
        ensure_positive(kind, "ku", self.ku)?;
        ensure_non_negative(kind, "cs", self.cs)
    }

    /// Suspension force acting upwards on the sprung mass.
    #[inline]
    pub(crate) fn suspension_force(&self, z_s: f64, v_s: f64, z_u: f64, v_u: f64) -> f64 {
        -self.ks * (z_s - z_u) - self.cs * (v_s - v_u)
    }

    /// Accelerations `(sprung, unsprung)` given the road height under the tyre
    /// and any extra force acting on the sprung mass from above.
    #[inline]
    pub(crate) fn accelerations(&self, y: &[f64], z_r: f64, sprung_extra: f64) -> (f64, f64) {
        let (z_s, v_s, z_u, v_u) = (y[0], y[1], y[2], y[3]);
        let f_susp = self.suspension_force(z_s, v_s, z_u, v_u);
        let a_s = (f_susp + sprung_extra) / self.ms;
        let a_u = (-f_susp - self.ku * (z_u - z_r)) / self.mu;
        (a_s, a_u)
    }
}

impl Dynamics for QuarterCar {
    fn dof(&self) -> usize {
        2
    }

    fn state_labels(&self) -> &'static [&'static str] {
        LABELS
    }

    fn derivative(&self, t: f64, y: &[f64], road: &RoadProfile, dydt: &mut [f64]) {
        let z_r = road.displacement(t);
        let (a_s, a_u) = self.accelerations(y, z_r, 0.0);
        dydt[0] = y[1];
        dydt[1] = a_s;
        dydt[2] = y[3];
        dydt[3] = a_u;
    }
}
