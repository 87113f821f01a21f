//! End-to-end checks of the simulated systems driven through a session

use phasedrift::SimulationError;
use phasedrift::history::{TIME_SERIES_CAPACITY, TRAJECTORY_CAPACITY};
use phasedrift::physics::integrators::IntegratorKind;
use phasedrift::physics::math::Scalar;
use phasedrift::physics::systems::{
    LorenzParameters, Parameters, SystemKind, SystemState, pendulum,
};
use phasedrift::session::SimulationSession;
use std::collections::BTreeMap;

const DT: Scalar = 0.01;

fn attractor(session: &SimulationSession) -> [Scalar; 3] {
    match session.state() {
        SystemState::Attractor(s) => *s,
        other => panic!("expected an attractor state, got {other:?}"),
    }
}

fn pendulum_state(session: &SimulationSession) -> [Scalar; 4] {
    match session.state() {
        SystemState::Pendulum(s) => *s,
        other => panic!("expected a pendulum state, got {other:?}"),
    }
}

fn assert_close(actual: Scalar, expected: Scalar, tolerance: Scalar) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}

#[test]
fn test_lorenz_first_euler_step() {
    let mut session = SimulationSession::new(SystemKind::Lorenz);
    session.step(DT).unwrap();

    let [x, y, z] = attractor(&session);
    assert_close(x, 1.0, 1e-12);
    assert_close(y, 1.26, 1e-12);
    assert_close(z, 1.0 - DT * 5.0 / 3.0, 1e-12);
    assert_close(session.elapsed(), DT, 1e-15);
    assert_eq!(session.trajectory().len(), 1);
}

#[test]
fn test_point_attractor_contracts_towards_origin() {
    let mut session = SimulationSession::new(SystemKind::PointAttractor);
    session.step(DT).unwrap();
    for c in attractor(&session) {
        assert_close(c, 5.0 * (1.0 - DT), 1e-12);
    }

    for _ in 0..2000 {
        session.step(DT).unwrap();
    }
    assert!(attractor(&session).iter().all(|c| c.abs() < 1e-6));
}

#[test]
fn test_point_repeller_moves_away_from_origin() {
    let mut session = SimulationSession::new(SystemKind::PointRepeller);
    let start = attractor(&session);
    for _ in 0..100 {
        session.step(DT).unwrap();
    }
    let end = attractor(&session);
    for (s, e) in start.iter().zip(end) {
        assert!(e > *s);
    }
}

#[test]
fn test_lorenz_fixed_point_is_stationary() {
    let [c_plus, _] = LorenzParameters::default().fixed_points().unwrap();
    let mut session = SimulationSession::new(SystemKind::Lorenz);
    session.set_state(SystemState::Attractor(c_plus)).unwrap();

    for _ in 0..10 {
        session.step(DT).unwrap();
    }
    for (actual, expected) in attractor(&session).iter().zip(c_plus) {
        assert_close(*actual, expected, 1e-9);
    }
}

#[test]
fn test_van_der_pol_settles_on_limit_cycle() {
    let mut session = SimulationSession::new(SystemKind::VanDerPol);
    for _ in 0..5000 {
        session.step(DT).unwrap();
    }

    let mut amplitude: Scalar = 0.0;
    for _ in 0..1000 {
        session.step(DT).unwrap();
        amplitude = amplitude.max(attractor(&session)[0].abs());
    }
    assert_close(amplitude, 2.0, 0.2);
    assert_eq!(attractor(&session)[2], 0.0);
}

#[test]
fn test_pendulum_falls_from_horizontal() {
    let mut session = SimulationSession::new(SystemKind::DoublePendulum);
    assert_eq!(session.integrator(), IntegratorKind::RungeKuttaFourthOrder);

    let [theta1, _, theta2, _] = pendulum_state(&session);
    session.step(DT).unwrap();
    let [next_theta1, omega1, next_theta2, omega2] = pendulum_state(&session);

    assert!(next_theta1 < theta1);
    assert!(omega1 < 0.0);
    // The outer link only starts to move once the inner one has
    assert!(next_theta2 < theta2);
    assert!(omega2 < 0.0);
    assert!(omega2.abs() < omega1.abs());
    assert!(session.pendulum_joints().is_some());
}

#[test]
fn test_pendulum_energy_is_conserved_with_rk4() {
    let mut session = SimulationSession::new(SystemKind::DoublePendulum);
    let initial = session.energy().unwrap();
    let scale = match session.parameters() {
        Parameters::DoublePendulum(p) => pendulum::characteristic_energy(p),
        other => panic!("unexpected parameters {other:?}"),
    };

    for _ in 0..1000 {
        session.step(DT).unwrap();
    }
    let drift = (session.energy().unwrap() - initial).abs();
    assert!(drift < 0.01 * scale, "energy drifted by {drift}");
}

#[test]
fn test_energy_is_only_defined_for_the_pendulum() {
    assert!(SimulationSession::new(SystemKind::Lorenz).energy().is_none());
    assert!(
        SimulationSession::new(SystemKind::DoublePendulum)
            .energy()
            .is_some()
    );
}

#[test]
fn test_history_buffers_stay_bounded() {
    let mut session = SimulationSession::new(SystemKind::Lorenz);
    for _ in 0..(TRAJECTORY_CAPACITY + 500) {
        session.step(DT).unwrap();
    }

    assert_eq!(session.trajectory().len(), TRAJECTORY_CAPACITY);
    assert_eq!(session.time_series().len(), TIME_SERIES_CAPACITY);

    let newest = session.trajectory().latest().unwrap().position;
    let [x, y, z] = attractor(&session);
    assert_eq!(newest.to_array(), [x, y, z]);
}

#[test]
fn test_instability_pauses_and_reset_recovers() {
    let mut session = SimulationSession::new(SystemKind::PointRepeller);
    let updates = BTreeMap::from([("lambda".to_string(), 1e300)]);
    session.set_parameters(&updates).unwrap();
    let before = *session.state();

    let mut failure = None;
    for _ in 0..10 {
        if let Err(error) = session.step(DT) {
            failure = Some(error);
            break;
        }
    }

    let error = failure.expect("the repeller should overflow");
    assert!(matches!(error, SimulationError::NumericalInstability { .. }));
    assert!(!session.is_running());
    assert!(session.state().is_finite());
    assert!(session.instability().is_some());
    assert_ne!(*session.state(), before);

    session.reset();
    assert!(session.is_running());
    assert!(session.instability().is_none());
    assert_eq!(*session.state(), SystemKind::PointRepeller.default_state());
}

#[test]
fn test_paused_session_does_not_advance() {
    let mut session = SimulationSession::new(SystemKind::Rossler);
    session.set_running(false);
    session.step(DT).unwrap();

    assert_eq!(*session.state(), SystemKind::Rossler.default_state());
    assert!(session.trajectory().is_empty());
    assert_eq!(session.elapsed(), 0.0);
}

#[test]
fn test_switching_systems_restores_defaults() {
    let mut session = SimulationSession::new(SystemKind::Lorenz);
    session.set_integrator(IntegratorKind::RungeKuttaFourthOrder);
    session.step(DT).unwrap();

    session.initialize("pendulum").unwrap();
    assert_eq!(session.system(), SystemKind::DoublePendulum);
    assert_eq!(*session.state(), SystemKind::DoublePendulum.default_state());
    assert!(session.trajectory().is_empty());

    session.initialize("Lorenz Attractor").unwrap();
    assert_eq!(session.integrator(), IntegratorKind::ExplicitEuler);

    assert!(matches!(
        session.initialize("henon"),
        Err(SimulationError::InvalidSystem(_))
    ));
    assert_eq!(session.system(), SystemKind::Lorenz);
}

#[test]
fn test_identical_sessions_are_deterministic() {
    for kind in SystemKind::ALL {
        let mut a = SimulationSession::new(kind);
        let mut b = SimulationSession::new(kind);
        for _ in 0..200 {
            a.step(DT).unwrap();
            b.step(DT).unwrap();
        }
        assert_eq!(a.state(), b.state(), "{kind}");
    }
}
