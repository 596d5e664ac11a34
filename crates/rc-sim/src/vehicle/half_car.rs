//! Half car: pitching body on front and rear axles.

use super::{ensure_non_negative, ensure_positive, to_map};
use crate::error::SimResult;
use crate::model::{Dynamics, ParamMap, VehicleKind, param};
use crate::road::RoadProfile;
use rc_core::units::{m, mps, transport_delay};
use uom::si::time::second;

/// Body with heave and pitch, two unsprung masses, tyres as pure springs.
///
/// The rear tyre meets the same road as the front one, `(a + b) / v`
/// seconds later.
///
/// State: `[z_s, z_s_dot, theta, theta_dot, z_u_f, z_u_f_dot, z_u_r, z_u_r_dot]`,
/// pitch positive nose-up (the body's front mount sits at `z_s + a * theta`).
#[derive(Clone, Debug, PartialEq)]
pub struct HalfCar {
    /// Sprung mass [kg]
    pub ms: f64,
    /// Pitch moment of inertia [kg m^2]
    pub inertia: f64,
    pub mu_f: f64,
    pub ks_f: f64,
    pub cs_f: f64,
    pub ku_f: f64,
    pub mu_r: f64,
    pub ks_r: f64,
    pub cs_r: f64,
    pub ku_r: f64,
    /// Centre of mass to front axle [m]
    pub a: f64,
    /// Centre of mass to rear axle [m]
    pub b: f64,
    /// Forward speed [m/s]
    pub longitudinal_velocity: f64,
}

impl Default for HalfCar {
    fn default() -> Self {
        Self {
            ms: 500.0,
            inertia: 1_000.0,
            mu_f: 25.0,
            ks_f: 10_000.0,
            cs_f: 1_000.0,
            ku_f: 75_000.0,
            mu_r: 25.0,
            ks_r: 10_000.0,
            cs_r: 1_000.0,
            ku_r: 70_000.0,
            a: 0.5,
            b: 0.5,
            longitudinal_velocity: 12.0,
        }
    }
}

const LABELS: &[&str] = &[
    "z_s",
    "z_s_dot",
    "theta",
    "theta_dot",
    "z_u_f",
    "z_u_f_dot",
    "z_u_r",
    "z_u_r_dot",
];

const VELOCITY_KEY: &str = "longitudinal_velocity";
/// Older records misspell the speed key.
const LEGACY_VELOCITY_KEY: &str = "longitudial_velocity";

impl HalfCar {
    pub fn from_params(params: &ParamMap) -> SimResult<Self> {
        let owner = VehicleKind::HalfCar.as_str();
        let velocity_key = if !params.contains_key(VELOCITY_KEY)
            && params.contains_key(LEGACY_VELOCITY_KEY)
        {
            LEGACY_VELOCITY_KEY
        } else {
            VELOCITY_KEY
        };
        Ok(Self {
            ms: param(params, owner, "ms")?,
            inertia: param(params, owner, "I")?,
            mu_f: param(params, owner, "mu_f")?,
            ks_f: param(params, owner, "ks_f")?,
            cs_f: param(params, owner, "cs_f")?,
            ku_f: param(params, owner, "ku_f")?,
            mu_r: param(params, owner, "mu_r")?,
            ks_r: param(params, owner, "ks_r")?,
            cs_r: param(params, owner, "cs_r")?,
            ku_r: param(params, owner, "ku_r")?,
            a: param(params, owner, "a")?,
            b: param(params, owner, "b")?,
            longitudinal_velocity: param(params, owner, velocity_key)?,
        })
    }

    pub fn params(&self) -> ParamMap {
        to_map(&[
            ("ms", self.ms),
            ("I", self.inertia),
            ("mu_f", self.mu_f),
            ("ks_f", self.ks_f),
            ("cs_f", self.cs_f),
            ("ku_f", self.ku_f),
            ("mu_r", self.mu_r),
            ("ks_r", self.ks_r),
            ("cs_r", self.cs_r),
            ("ku_r", self.ku_r),
            ("a", self.a),
            ("b", self.b),
            (VELOCITY_KEY, self.longitudinal_velocity),
        ])
    }

    pub fn validate(&self) -> SimResult<()> {
        let kind = VehicleKind::HalfCar;
        for (name, value) in [
            ("ms", self.ms),
            ("I", self.inertia),
            ("mu_f", self.mu_f),
            ("ks_f", self.ks_f),
            ("ku_f", self.ku_f),
            ("mu_r", self.mu_r),
            ("ks_r", self.ks_r),
            ("ku_r", self.ku_r),
            ("longitudinal_velocity", self.longitudinal_velocity),
        ] {
            ensure_positive(kind, name, value)?;
        }
        for (name, value) in [
            ("cs_f", self.cs_f),
            ("cs_r", self.cs_r),
            ("a", self.a),
            ("b", self.b),
        ] {
            ensure_non_negative(kind, name, value)?;
        }
        Ok(())
    }

    /// Seconds between the front and rear tyre crossing the same road point.
    pub fn axle_delay(&self) -> f64 {
        transport_delay(m(self.a + self.b), mps(self.longitudinal_velocity)).get::<second>()
    }
}

impl Dynamics for HalfCar {
    fn dof(&self) -> usize {
        4
    }

    fn state_labels(&self) -> &'static [&'static str] {
        LABELS
    }

    fn rear_axle_delay(&self) -> Option<f64> {
        Some(self.axle_delay())
    }

    fn derivative(&self, t: f64, y: &[f64], road: &RoadProfile, dydt: &mut [f64]) {
        let (z_s, v_s, theta, omega) = (y[0], y[1], y[2], y[3]);
        let (z_uf, v_uf, z_ur, v_ur) = (y[4], y[5], y[6], y[7]);
        let z_gf = road.displacement(t);
        let z_gr = road.delayed_displacement(t, self.axle_delay());

        // Tyre forces on the unsprung masses.
        let f_tf = self.ku_f * (z_gf - z_uf);
        let f_tr = self.ku_r * (z_gr - z_ur);

        // Suspension forces on the body at each axle.
        let f_sf =
            self.ks_f * (z_uf - z_s - self.a * theta) + self.cs_f * (v_uf - v_s - self.a * omega);
        let f_sr =
            self.ks_r * (z_ur - z_s + self.b * theta) + self.cs_r * (v_ur - v_s + self.b * omega);

        dydt[0] = v_s;
        dydt[1] = (f_sf + f_sr) / self.ms;
        dydt[2] = omega;
        dydt[3] = (self.a * f_sf - self.b * f_sr) / self.inertia;
        dydt[4] = v_uf;
        dydt[5] = (f_tf - f_sf) / self.mu_f;
        dydt[6] = v_ur;
        dydt[7] = (f_tr - f_sr) / self.mu_r;
    }
}
