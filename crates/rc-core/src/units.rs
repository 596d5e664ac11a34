// rc-core/src/units.rs

use uom::si::f64::{Angle as UomAngle, Length as UomLength, Time as UomTime, Velocity as UomVelocity};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type Length = UomLength;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

/// Radians to degrees, used only where pitch angles are reported.
#[inline]
pub fn rad_to_deg(v: f64) -> f64 {
    use uom::si::angle::degree;
    rad(v).get::<degree>()
}

/// Time for a point on the road to travel from the front axle to the rear axle.
#[inline]
pub fn transport_delay(wheelbase: Length, speed: Velocity) -> Time {
    wheelbase / speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_turn_is_180_degrees() {
        assert!((rad_to_deg(std::f64::consts::PI) - 180.0).abs() < 1e-12);
        assert_eq!(rad_to_deg(0.0), 0.0);
    }

    #[test]
    fn delay_is_wheelbase_over_speed() {
        use uom::si::time::second;
        let delay = transport_delay(m(1.0), mps(12.0));
        assert!((delay.get::<second>() - 1.0 / 12.0).abs() < 1e-15);
    }
}
