//! The simulation session: one system, its state, and its recent history
//!
//! A session is a plain value. The viewer keeps one in a resource and calls
//! [`SimulationSession::step`] once per frame; tests drive it directly.

use crate::error::SimulationError;
use crate::history::{
    ProjectionBuffers, TIME_SERIES_CAPACITY, TRAJECTORY_CAPACITY, TimeSeriesBuffer,
    TrajectoryBuffer,
};
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::{Scalar, Vector, norm};
use crate::physics::systems::{Parameters, PendulumJoints, SystemKind, SystemState, pendulum};
use crate::utils::color::velocity_color;
use bevy::log::{debug, info, warn};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacities {
    pub trajectory: usize,
    pub time_series: usize,
}

impl Default for BufferCapacities {
    fn default() -> Self {
        Self {
            trajectory: TRAJECTORY_CAPACITY,
            time_series: TIME_SERIES_CAPACITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationSession {
    kind: SystemKind,
    parameters: Parameters,
    state: SystemState,
    integrator: IntegratorKind,
    running: bool,
    time: Scalar,
    instability: Option<SimulationError>,
    trajectory: TrajectoryBuffer,
    projections: ProjectionBuffers,
    time_series: TimeSeriesBuffer,
    joints: Option<PendulumJoints>,
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new(SystemKind::Lorenz)
    }
}

impl SimulationSession {
    /// A running session on `kind` with its default parameters and state
    pub fn new(kind: SystemKind) -> Self {
        Self::with_capacities(kind, BufferCapacities::default())
    }

    pub fn with_capacities(kind: SystemKind, capacities: BufferCapacities) -> Self {
        let mut session = Self {
            kind,
            parameters: kind.default_parameters(),
            state: kind.default_state(),
            integrator: kind.default_integrator(),
            running: true,
            time: 0.0,
            instability: None,
            trajectory: TrajectoryBuffer::new(capacities.trajectory),
            projections: ProjectionBuffers::new(capacities.trajectory),
            time_series: TimeSeriesBuffer::new(capacities.time_series),
            joints: None,
        };
        session.update_joints();
        session
    }

    /// Switches to the system named by `key` (a key such as `"lorenz"` or a
    /// display name), restoring its defaults
    ///
    /// An unknown name leaves the session untouched.
    pub fn initialize(&mut self, key: &str) -> Result<(), SimulationError> {
        let kind = key.parse::<SystemKind>()?;
        self.select(kind);
        Ok(())
    }

    /// Switches to `kind` with default parameters, state and integrator
    pub fn select(&mut self, kind: SystemKind) {
        info!("Initializing {}", kind.display_name());
        self.kind = kind;
        self.parameters = kind.default_parameters();
        self.integrator = kind.default_integrator();
        self.restart(kind.default_state());
    }

    /// Back to the default state with empty history; parameters are kept
    pub fn reset(&mut self) {
        info!("Resetting {}", self.kind.display_name());
        self.restart(self.kind.default_state());
    }

    fn restart(&mut self, state: SystemState) {
        self.state = state;
        self.time = 0.0;
        self.clear_history();
        if self.instability.take().is_some() {
            self.running = true;
        }
        self.update_joints();
    }

    /// Advances one step of length `dt`
    ///
    /// Does nothing while paused. On numerical instability the session
    /// pauses itself, keeps its last finite state and records the error,
    /// which is also returned.
    pub fn step(&mut self, dt: Scalar) -> Result<(), SimulationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimulationError::InvalidTimeStep(dt));
        }
        if !self.running {
            return Ok(());
        }

        let next = self
            .parameters
            .advance(self.integrator, &self.state, self.time, dt)
            .and_then(|next| {
                if next.is_finite() {
                    Ok(next)
                } else {
                    Err(SimulationError::instability(
                        self.kind.display_name(),
                        self.time + dt,
                        "state became non-finite",
                    ))
                }
            })
            .and_then(|next| {
                self.speed_at(&next, self.time + dt)
                    .map(|speed| (next, speed))
            });

        match next {
            Ok((next, speed)) => {
                self.state = next;
                self.time += dt;
                self.update_joints();
                self.record(speed);
                Ok(())
            }
            Err(error) => {
                if error.is_instability() {
                    warn!("{error}; pausing simulation");
                    self.running = false;
                    self.instability = Some(error.clone());
                }
                Err(error)
            }
        }
    }

    /// Speed used to colour the trajectory point recorded for `state`
    ///
    /// Angular speed for the pendulum, the norm of the flow for attractors.
    fn speed_at(&self, state: &SystemState, time: Scalar) -> Result<Scalar, SimulationError> {
        match state {
            SystemState::Pendulum([_, omega1, _, omega2]) => Ok(norm(&[*omega1, *omega2])),
            SystemState::Attractor(_) => {
                let derivative = self.parameters.derivative(state, time)?;
                Ok(norm(derivative.as_slice()))
            }
        }
    }

    /// Pushes the current state into the history buffers
    fn record(&mut self, speed: Scalar) {
        let position = match (&self.state, &self.joints) {
            (SystemState::Pendulum(_), Some(joints)) => joints.bob2,
            (SystemState::Pendulum(_), None) => Vector::ZERO,
            (SystemState::Attractor([x, y, z]), _) => Vector::new(*x, *y, *z),
        };

        self.trajectory.push(position, velocity_color(speed));
        self.projections.push(position);
        self.time_series.push(self.time, self.state.as_slice());
    }

    fn update_joints(&mut self) {
        self.joints = match (&self.parameters, &self.state) {
            (Parameters::DoublePendulum(params), SystemState::Pendulum(state)) => {
                Some(pendulum::joints(state, params))
            }
            _ => None,
        };
    }

    fn clear_history(&mut self) {
        self.trajectory.clear();
        self.projections.clear();
        self.time_series.clear();
    }

    /// Merges `updates` into the current parameters
    ///
    /// Every name must belong to the active system; otherwise nothing is
    /// applied.
    pub fn set_parameters(
        &mut self,
        updates: &BTreeMap<String, Scalar>,
    ) -> Result<(), SimulationError> {
        self.parameters.merge(updates)?;
        debug!("Updated {} parameters: {:?}", self.kind.display_name(), updates);
        self.update_joints();
        Ok(())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Replaces the state, which must match the active system
    pub fn set_state(&mut self, state: SystemState) -> Result<(), SimulationError> {
        let state = SystemState::from_components(self.kind, state.as_slice())?;
        self.state = state;
        self.update_joints();
        Ok(())
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn system(&self) -> SystemKind {
        self.kind
    }

    /// Total mechanical energy, for the double pendulum only
    pub fn energy(&self) -> Option<Scalar> {
        match (&self.parameters, &self.state) {
            (Parameters::DoublePendulum(params), SystemState::Pendulum(state)) => {
                Some(pendulum::energy(state, params))
            }
            _ => None,
        }
    }

    pub fn pendulum_joints(&self) -> Option<PendulumJoints> {
        self.joints
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Flips the running flag and returns the new value
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The error that auto-paused the session, until the next reset
    pub fn instability(&self) -> Option<&SimulationError> {
        self.instability.as_ref()
    }

    /// Simulated time since the last reset
    pub fn elapsed(&self) -> Scalar {
        self.time
    }

    pub fn integrator(&self) -> IntegratorKind {
        self.integrator
    }

    /// Overrides the system's default integrator until the next `select`
    pub fn set_integrator(&mut self, integrator: IntegratorKind) {
        if integrator != self.integrator {
            info!("Switching {} to {}", self.kind.display_name(), integrator);
            self.integrator = integrator;
        }
    }

    pub fn trajectory(&self) -> &TrajectoryBuffer {
        &self.trajectory
    }

    pub fn projections(&self) -> &ProjectionBuffers {
        &self.projections
    }

    pub fn time_series(&self) -> &TimeSeriesBuffer {
        &self.time_series
    }

    /// Installs a complete, already validated configuration
    pub(crate) fn install(&mut self, parameters: Parameters, state: SystemState) {
        let kind = parameters.kind();
        if kind != self.kind {
            self.kind = kind;
            self.integrator = kind.default_integrator();
        }
        self.parameters = parameters;
        self.restart(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn attractor(session: &SimulationSession) -> [Scalar; 3] {
        match session.state() {
            SystemState::Attractor(s) => *s,
            other => panic!("expected attractor state, got {other:?}"),
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = SimulationSession::default();
        assert_eq!(session.system(), SystemKind::Lorenz);
        assert_eq!(session.state(), &SystemState::Attractor([1.0, 1.0, 1.0]));
        assert_eq!(session.integrator(), IntegratorKind::ExplicitEuler);
        assert!(session.is_running());
        assert!(session.trajectory().is_empty());
        assert_eq!(session.energy(), None);
        assert_eq!(session.pendulum_joints(), None);
    }

    #[test]
    fn test_lorenz_single_euler_step() {
        let mut session = SimulationSession::new(SystemKind::Lorenz);
        session.step(0.01).unwrap();

        let [x, y, z] = attractor(&session);
        assert_eq!(x, 1.0);
        assert!((y - 1.26).abs() < 1e-12);
        assert!((z - (1.0 - 0.01 * 5.0 / 3.0)).abs() < 1e-12);
        assert_eq!(session.trajectory().len(), 1);
        assert_eq!(session.time_series().len(), 1);
        assert!((session.elapsed() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_initialize_unknown_system_leaves_session_untouched() {
        let mut session = SimulationSession::new(SystemKind::Rossler);
        session.step(0.01).unwrap();
        let before = *session.state();

        let error = session.initialize("henon").unwrap_err();
        assert_eq!(error, SimulationError::InvalidSystem("henon".into()));
        assert_eq!(session.system(), SystemKind::Rossler);
        assert_eq!(session.state(), &before);
        assert_eq!(session.trajectory().len(), 1);
    }

    #[test]
    fn test_initialize_restores_defaults() {
        let mut session = SimulationSession::new(SystemKind::Lorenz);
        session
            .set_parameters(&BTreeMap::from([("rho".to_string(), 14.0)]))
            .unwrap();
        session.set_integrator(IntegratorKind::RungeKuttaFourthOrder);
        session.step(0.01).unwrap();

        session.initialize("pendulum").unwrap();
        assert_eq!(session.system(), SystemKind::DoublePendulum);
        assert_eq!(session.integrator(), IntegratorKind::RungeKuttaFourthOrder);
        assert_eq!(session.elapsed(), 0.0);
        assert!(session.trajectory().is_empty());
        assert!(session.pendulum_joints().is_some());

        session.initialize("Lorenz Attractor").unwrap();
        assert_eq!(session.parameters().get("rho"), Some(28.0));
        assert_eq!(session.integrator(), IntegratorKind::ExplicitEuler);
    }

    #[test]
    fn test_paused_step_is_noop() {
        let mut session = SimulationSession::new(SystemKind::Lorenz);
        session.set_running(false);
        session.step(0.01).unwrap();
        assert_eq!(attractor(&session), [1.0, 1.0, 1.0]);
        assert!(session.trajectory().is_empty());

        assert!(session.toggle_running());
        assert!(session.is_running());
    }

    #[test]
    fn test_invalid_time_step() {
        let mut session = SimulationSession::default();
        for dt in [0.0, -0.01, Scalar::NAN, Scalar::INFINITY] {
            assert!(matches!(
                session.step(dt),
                Err(SimulationError::InvalidTimeStep(_))
            ));
        }
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn test_reset_keeps_parameters() {
        let mut session = SimulationSession::new(SystemKind::PointAttractor);
        session
            .set_parameters(&BTreeMap::from([("lambda".to_string(), 3.0)]))
            .unwrap();
        for _ in 0..10 {
            session.step(0.01).unwrap();
        }

        session.reset();
        assert_eq!(attractor(&session), [5.0, 5.0, 5.0]);
        assert_eq!(session.parameters().get("lambda"), Some(3.0));
        assert!(session.trajectory().is_empty());
        assert!(session.projections().is_empty());
        assert!(session.time_series().is_empty());
    }

    #[test]
    fn test_unknown_parameter_rejected_atomically() {
        let mut session = SimulationSession::new(SystemKind::Rossler);
        let updates = BTreeMap::from([("a".to_string(), 0.3), ("sigma".to_string(), 1.0)]);
        assert!(matches!(
            session.set_parameters(&updates),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert_eq!(session.parameters().get("a"), Some(0.2));
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let mut session = SimulationSession::new(SystemKind::DoublePendulum);
        for value in [Scalar::INFINITY, Scalar::NEG_INFINITY, Scalar::NAN] {
            let updates = BTreeMap::from([("m1".to_string(), 2.0), ("damping".to_string(), value)]);
            assert!(matches!(
                session.set_parameters(&updates),
                Err(SimulationError::InvalidConfiguration(_))
            ));
            assert_eq!(session.parameters().get("m1"), Some(1.0));
            assert_eq!(session.parameters().get("damping"), Some(0.0));
        }

        // Negative damping is implausible but finite, so it is accepted
        let updates = BTreeMap::from([("damping".to_string(), -0.5)]);
        session.set_parameters(&updates).unwrap();
        assert_eq!(session.parameters().get("damping"), Some(-0.5));
    }

    #[test]
    fn test_instability_pauses_and_keeps_last_finite_state() {
        let mut session = SimulationSession::new(SystemKind::PointRepeller);
        session
            .set_parameters(&BTreeMap::from([("lambda".to_string(), 1e300)]))
            .unwrap();

        // 0.1 + 1e300 · 0.1 · 0.01 is finite, the next step overflows
        session.step(0.01).unwrap();
        let last_finite = *session.state();
        let recorded = session.trajectory().len();

        let error = session.step(0.01).unwrap_err();
        assert!(error.is_instability());
        assert!(!session.is_running());
        assert_eq!(session.instability(), Some(&error));
        assert_eq!(session.state(), &last_finite);
        assert_eq!(session.trajectory().len(), recorded);

        // Paused now, so further steps do nothing
        session.step(0.01).unwrap();
        assert_eq!(session.state(), &last_finite);

        session.reset();
        assert!(session.instability().is_none());
        assert!(session.is_running());
    }

    #[test]
    fn test_pendulum_singularity_is_reported() {
        let mut session = SimulationSession::new(SystemKind::DoublePendulum);
        session
            .set_parameters(&BTreeMap::from([("m1".to_string(), 0.0)]))
            .unwrap();

        let error = session.step(0.01).unwrap_err();
        assert!(matches!(
            error,
            SimulationError::NumericalInstability { system: "Double Pendulum", .. }
        ));
        assert!(!session.is_running());
        assert_eq!(session.state(), &SystemState::Pendulum([FRAC_PI_2, 0.0, FRAC_PI_2, 0.0]));
    }

    #[test]
    fn test_pendulum_records_lower_bob() {
        let mut session = SimulationSession::new(SystemKind::DoublePendulum);
        session.step(0.01).unwrap();

        let joints = session.pendulum_joints().unwrap();
        let latest = session.trajectory().latest().unwrap();
        assert_eq!(latest.position, joints.bob2);
        assert_eq!(latest.position.z, 0.0);
        assert_eq!(session.time_series().latest().unwrap().components.len(), 4);
        assert!(session.energy().is_some());
    }

    #[test]
    fn test_attractor_colour_follows_flow_speed() {
        let mut session = SimulationSession::new(SystemKind::Lorenz);
        session.step(0.01).unwrap();

        let derivative = session
            .parameters()
            .derivative(session.state(), session.elapsed())
            .unwrap();
        let latest = session.trajectory().latest().unwrap();
        assert_eq!(latest.color, velocity_color(norm(derivative.as_slice())));
    }

    #[test]
    fn test_set_state_validates_dimension() {
        let mut session = SimulationSession::new(SystemKind::VanDerPol);
        assert!(session.set_state(SystemState::Pendulum([0.0; 4])).is_err());
        session.set_state(SystemState::Attractor([2.0, 0.0, 0.0])).unwrap();
        assert_eq!(attractor(&session), [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_custom_capacities() {
        let mut session = SimulationSession::with_capacities(
            SystemKind::Lorenz,
            BufferCapacities {
                trajectory: 5,
                time_series: 3,
            },
        );
        for _ in 0..10 {
            session.step(0.001).unwrap();
        }
        assert_eq!(session.trajectory().len(), 5);
        assert_eq!(session.projections().len(), 5);
        assert_eq!(session.time_series().len(), 3);
    }
}
