//! Reference ride-comfort scenarios.
//!
//! Vehicle constants come from a published thesis on seat vibration and ride
//! comfort. The pinned values are this engine's output at its default
//! tolerances (rtol 1e-3, atol 1e-6) and are held to [`PINNED`] relative
//! error, so a change in step control shows up here. The remaining checks are
//! coarse sanity bounds.

use rc_metrics::{ComfortMetrics, compute_metrics};
use rc_sim::{
    HalfCar, QuarterCar, RoadProfile, SeatAddedQuarterCar, SimOptions, Vehicle, VehicleModel,
    run_sim,
};

fn thesis_quarter_car() -> QuarterCar {
    QuarterCar {
        ms: 270.0,
        mu: 60.0,
        ks: 27_000.0,
        cs: 2_000.0,
        ku: 200_000.0,
    }
}

fn step_road() -> RoadProfile {
    RoadProfile::Step {
        amplitude: 0.05,
        activation_time: 1.0,
    }
}

fn metrics_for(vehicle: Vehicle, road: &RoadProfile, opts: &SimOptions) -> ComfortMetrics {
    let model = VehicleModel::at_rest(vehicle).expect("valid vehicle");
    let traj = run_sim(&model, road, opts).expect("run succeeds");
    compute_metrics(&traj).expect("metrics")
}

/// Relative tolerance for pinned solver output.
const PINNED: f64 = 1e-3;

fn assert_within(name: &str, value: f64, expected: f64, rel: f64) {
    let err = (value - expected).abs() / expected.abs();
    assert!(
        err <= rel,
        "{name}: {value} differs from {expected} by {:.3}%",
        err * 100.0
    );
}

fn assert_between(name: &str, value: f64, lo: f64, hi: f64) {
    assert!(value >= lo && value <= hi, "{name}: {value} not in [{lo}, {hi}]");
}

#[test]
fn quarter_car_step_road() {
    let metrics = metrics_for(
        Vehicle::QuarterCar(thesis_quarter_car()),
        &step_road(),
        &SimOptions::uniform(0.0, 3.0, 5000),
    );
    let ComfortMetrics::QuarterCar { sprung, unsprung } = metrics else {
        panic!("expected quarter car metrics");
    };

    assert_within("sprung peak acc", sprung.peak_acceleration, 15.3869, PINNED);
    assert_within("unsprung peak acc", unsprung.peak_acceleration, 171.6007, PINNED);
    assert_within("sprung range", sprung.displacement_range, 0.073907, PINNED);
    assert_within("sprung peak disp", sprung.peak_displacement, 0.0739, 0.05);
    assert_within("unsprung peak disp", unsprung.peak_displacement, 0.0672, 0.05);
    assert_within("sprung peak vel", sprung.peak_velocity, 0.554, 0.05);
    assert_within("unsprung peak vel", unsprung.peak_velocity, 1.93, 0.05);
    assert!(sprung.rms_acceleration > 0.0 && sprung.rms_acceleration < sprung.peak_acceleration);
}

#[test]
fn quarter_car_sinusoidal_road() {
    let road = RoadProfile::Sinusoidal {
        amplitude: 0.05,
        frequency: 1.0,
    };
    let metrics = metrics_for(
        Vehicle::QuarterCar(thesis_quarter_car()),
        &road,
        &SimOptions::uniform(0.0, 3.0, 5000),
    );
    let sprung_acc = metrics.field("sprung.peak_acceleration").unwrap();
    let sprung_range = metrics.field("sprung.displacement_range").unwrap();
    let unsprung_acc = metrics.field("unsprung.peak_acceleration").unwrap();

    assert_within("sprung peak acc", sprung_acc, 3.5591, PINNED);
    assert_within("sprung range", sprung_range, 0.162101, PINNED);
    assert_within("unsprung peak acc", unsprung_acc, 12.07, 0.15);
}

#[test]
fn quarter_car_chirp_road() {
    let road = RoadProfile::Chirp {
        amplitude: 0.01,
        initial_frequency: 0.0,
        final_frequency: 20.0,
        end_time: 5.0,
    };
    let metrics = metrics_for(
        Vehicle::QuarterCar(thesis_quarter_car()),
        &road,
        &SimOptions::uniform(0.0, 5.0, 50_000),
    );
    let unsprung_acc = metrics.field("unsprung.peak_acceleration").unwrap();
    let sprung_range = metrics.field("sprung.displacement_range").unwrap();

    assert_within("unsprung peak acc", unsprung_acc, 61.654, PINNED);
    assert_within("sprung range", sprung_range, 0.0275, 0.08);
}

#[test]
fn seat_added_quarter_car_step_road() {
    let seat_car = SeatAddedQuarterCar {
        m_seat: 88.0,
        k_seat: 16_000.0,
        c_seat: 500.0,
        base: thesis_quarter_car(),
    };
    let metrics = metrics_for(
        Vehicle::SeatAddedQuarterCar(seat_car),
        &step_road(),
        &SimOptions::uniform(0.0, 3.0, 5000),
    );
    let ComfortMetrics::SeatAddedQuarterCar { seat, sprung, .. } = metrics else {
        panic!("expected seat car metrics");
    };

    assert_within("seat range", seat.displacement_range, 0.090848, PINNED);
    assert_within("sprung range", sprung.displacement_range, 0.071781, PINNED);
    // The seat suspension amplifies the body motion under a step.
    assert!(seat.displacement_range > sprung.displacement_range);
}

#[test]
fn half_car_step_road() {
    let metrics = metrics_for(
        Vehicle::HalfCar(HalfCar::default()),
        &step_road(),
        &SimOptions::uniform(0.0, 3.0, 5000),
    );
    let ComfortMetrics::HalfCar {
        body,
        pitch,
        front,
        rear,
    } = metrics
    else {
        panic!("expected half car metrics");
    };

    for (name, value) in metrics_values(&[body, pitch, front, rear]) {
        assert!(value.is_finite() && value > 0.0, "{name} = {value}");
    }
    // Both axles climb the same step, so the body ends up displaced by it.
    assert_between("body range", body.displacement_range, 0.045, 0.1);
    assert_between("front range", front.displacement_range, 0.045, 0.08);
    assert_between("rear range", rear.displacement_range, 0.045, 0.08);
    // Pitch stays within a few degrees.
    assert!(pitch.peak_displacement < 10.0);
}

fn metrics_values(channels: &[rc_metrics::ChannelMetrics]) -> Vec<(String, f64)> {
    channels
        .iter()
        .enumerate()
        .flat_map(|(i, m)| {
            [
                (format!("{i}.peak_displacement"), m.peak_displacement),
                (format!("{i}.peak_velocity"), m.peak_velocity),
                (format!("{i}.peak_acceleration"), m.peak_acceleration),
                (format!("{i}.rms_acceleration"), m.rms_acceleration),
                (format!("{i}.displacement_range"), m.displacement_range),
            ]
        })
        .collect()
}
