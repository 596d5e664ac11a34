//! Integration tests: state layout and physical trends of each vehicle model.
//!
//! Test that demonstrates:
//! - Derivative of every displacement is its paired velocity, for all variants
//! - Step response settles at the road height
//! - Half car rear axle responds after the transport delay

use proptest::prelude::*;
use rc_sim::{
    Dynamics, HalfCar, QuarterCar, RoadProfile, SeatAddedQuarterCar, SimOptions, Vehicle,
    VehicleKind, VehicleModel, run_sim,
};

fn all_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::QuarterCar(QuarterCar::default()),
        Vehicle::SeatAddedQuarterCar(SeatAddedQuarterCar::default()),
        Vehicle::HalfCar(HalfCar::default()),
    ]
}

fn thesis_quarter_car() -> VehicleModel {
    VehicleModel::at_rest(Vehicle::QuarterCar(QuarterCar {
        ms: 270.0,
        mu: 60.0,
        ks: 27_000.0,
        cs: 2_000.0,
        ku: 200_000.0,
    }))
    .expect("valid quarter car")
}

proptest! {
    #[test]
    fn displacement_derivative_is_paired_velocity(
        state in prop::collection::vec(-0.5_f64..0.5, 8),
        t in 0.0_f64..5.0,
    ) {
        let road = RoadProfile::Chirp {
            amplitude: 0.01,
            initial_frequency: 0.0,
            final_frequency: 20.0,
            end_time: 5.0,
        };
        for vehicle in all_vehicles() {
            let n = vehicle.state_len();
            prop_assert_eq!(n, 2 * vehicle.dof());
            prop_assert_eq!(vehicle.state_labels().len(), n);
            let y = &state[..n];
            let mut dydt = vec![f64::NAN; n];
            vehicle.derivative(t, y, &road, &mut dydt);
            for k in 0..vehicle.dof() {
                prop_assert_eq!(dydt[2 * k], y[2 * k + 1]);
            }
            prop_assert!(dydt.iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn step_response_settles_at_road_height() {
    let road = RoadProfile::Step {
        amplitude: 0.05,
        activation_time: 1.0,
    };
    let traj = run_sim(&thesis_quarter_car(), &road, &SimOptions::uniform(0.0, 3.0, 5000))
        .expect("run succeeds");
    let z_s = traj.row(0);
    let z_u = traj.row(2);
    assert!((z_s[z_s.len() - 1] - 0.05).abs() < 2e-3);
    assert!((z_u[z_u.len() - 1] - 0.05).abs() < 2e-3);
    // Before the step only interpolation error shows up.
    let before = traj.t.iter().take_while(|&&t| t < 1.0).count();
    assert!(z_s[..before].iter().all(|v| v.abs() < 1e-4));
    assert_eq!(z_s[0], 0.0);
}

#[test]
fn sprung_mass_overshoots_step() {
    let road = RoadProfile::Step {
        amplitude: 0.05,
        activation_time: 1.0,
    };
    let traj = run_sim(&thesis_quarter_car(), &road, &SimOptions::uniform(0.0, 3.0, 5000))
        .expect("run succeeds");
    let peak = traj.row(0).iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(peak > 0.05 && peak < 0.1, "peak = {peak}");
}

#[test]
fn half_car_rear_axle_lags_front() {
    let car = HalfCar::default();
    let delay = car.axle_delay();
    let model = VehicleModel::at_rest(Vehicle::HalfCar(car)).expect("valid half car");
    let road = RoadProfile::Step {
        amplitude: 0.05,
        activation_time: 0.5,
    };
    let traj = run_sim(&model, &road, &SimOptions::uniform(0.0, 1.5, 3001)).expect("run succeeds");
    assert_eq!(traj.kind, VehicleKind::HalfCar);

    let rear_input = traj.road_rear.as_ref().expect("half car records rear input");
    for (i, &t) in traj.t.iter().enumerate() {
        let expected_front = if t >= 0.5 { 0.05 } else { 0.0 };
        assert_eq!(traj.road[i], expected_front);
        if t < 0.5 + delay - 1e-9 {
            assert_eq!(rear_input[i], 0.0, "t = {t}");
        }
        if t > 0.5 + delay + 1e-9 {
            assert_eq!(rear_input[i], 0.05, "t = {t}");
        }
    }

    // Just before the rear tyre reaches the step, the front wheel has moved
    // far more than the rear one.
    let idx = traj
        .t
        .iter()
        .position(|&t| t >= 0.5 + 0.8 * delay)
        .expect("sample inside grid");
    let z_u_f = traj.row(4)[idx];
    let z_u_r = traj.row(6)[idx];
    assert!(z_u_f > 10.0 * z_u_r.abs(), "front {z_u_f}, rear {z_u_r}");
}

#[test]
fn identical_inputs_give_identical_trajectories() {
    let model = VehicleModel::at_rest(Vehicle::SeatAddedQuarterCar(
        SeatAddedQuarterCar::default(),
    ))
    .expect("valid seat car");
    let road = RoadProfile::Sinusoidal {
        amplitude: 0.05,
        frequency: 1.0,
    };
    let opts = SimOptions::uniform(0.0, 3.0, 2000);
    let a = run_sim(&model, &road, &opts).expect("first run");
    let b = run_sim(&model, &road, &opts).expect("second run");
    assert_eq!(a.t, b.t);
    assert_eq!(a.y, b.y);
    assert_eq!(a.road, b.road);
}
