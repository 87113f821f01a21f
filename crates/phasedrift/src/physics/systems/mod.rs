//! The six simulated systems
//!
//! `SystemKind` is the closed set of systems; `Parameters` and `SystemState`
//! carry the per-system data with the variant fixing the dimension, so a
//! Lorenz parameter set can never be paired with a pendulum state.

use crate::error::SimulationError;
use crate::physics::integrators::{IntegratorKind, VectorField};
use crate::physics::math::{Scalar, StateVector, all_finite};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod attractors;
pub mod pendulum;

pub use attractors::{
    LorenzParameters, PointAttractorParameters, PointRepellerParameters, RosslerParameters,
    VanDerPolParameters,
};
pub use pendulum::{DoublePendulumParameters, PendulumJoints};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Lorenz,
    Rossler,
    VanDerPol,
    PointAttractor,
    PointRepeller,
    DoublePendulum,
}

impl SystemKind {
    /// In menu order; the viewer binds keys 1–6 to these
    pub const ALL: [SystemKind; 6] = [
        SystemKind::Lorenz,
        SystemKind::Rossler,
        SystemKind::VanDerPol,
        SystemKind::PointAttractor,
        SystemKind::PointRepeller,
        SystemKind::DoublePendulum,
    ];

    /// Short identifier used on the command line and in config files
    pub fn key(self) -> &'static str {
        match self {
            SystemKind::Lorenz => "lorenz",
            SystemKind::Rossler => "rossler",
            SystemKind::VanDerPol => "vanderpol",
            SystemKind::PointAttractor => "attractor",
            SystemKind::PointRepeller => "repeller",
            SystemKind::DoublePendulum => "pendulum",
        }
    }

    /// Human-readable name, also the `system` field of saved configurations
    pub fn display_name(self) -> &'static str {
        match self {
            SystemKind::Lorenz => "Lorenz Attractor",
            SystemKind::Rossler => "Rössler Attractor",
            SystemKind::VanDerPol => "Van der Pol Oscillator",
            SystemKind::PointAttractor => "Point Attractor",
            SystemKind::PointRepeller => "Point Repeller",
            SystemKind::DoublePendulum => pendulum::DISPLAY_NAME,
        }
    }

    pub fn dimension(self) -> usize {
        match self {
            SystemKind::DoublePendulum => 4,
            _ => 3,
        }
    }

    pub fn default_parameters(self) -> Parameters {
        match self {
            SystemKind::Lorenz => Parameters::Lorenz(LorenzParameters::default()),
            SystemKind::Rossler => Parameters::Rossler(RosslerParameters::default()),
            SystemKind::VanDerPol => Parameters::VanDerPol(VanDerPolParameters::default()),
            SystemKind::PointAttractor => {
                Parameters::PointAttractor(PointAttractorParameters::default())
            }
            SystemKind::PointRepeller => {
                Parameters::PointRepeller(PointRepellerParameters::default())
            }
            SystemKind::DoublePendulum => {
                Parameters::DoublePendulum(DoublePendulumParameters::default())
            }
        }
    }

    pub fn default_state(self) -> SystemState {
        match self {
            SystemKind::Lorenz | SystemKind::Rossler => SystemState::Attractor([1.0, 1.0, 1.0]),
            SystemKind::VanDerPol => SystemState::Attractor([1.0, 0.0, 0.0]),
            SystemKind::PointAttractor => SystemState::Attractor([5.0, 5.0, 5.0]),
            SystemKind::PointRepeller => SystemState::Attractor([0.1, 0.1, 0.1]),
            SystemKind::DoublePendulum => {
                let half_pi = std::f64::consts::FRAC_PI_2;
                SystemState::Pendulum([half_pi, 0.0, half_pi, 0.0])
            }
        }
    }

    /// Euler for the dissipative attractors, RK4 for the pendulum
    pub fn default_integrator(self) -> IntegratorKind {
        match self {
            SystemKind::DoublePendulum => IntegratorKind::RungeKuttaFourthOrder,
            _ => IntegratorKind::ExplicitEuler,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.display_name() == name)
    }

    /// Menu position starting at 1
    pub fn from_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SystemKind {
    type Err = SimulationError;

    /// Accepts a key or a display name
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_key(name)
            .or_else(|| Self::from_display_name(name))
            .ok_or_else(|| SimulationError::InvalidSystem(name.to_string()))
    }
}

/// Parameters of the active system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameters {
    Lorenz(LorenzParameters),
    Rossler(RosslerParameters),
    VanDerPol(VanDerPolParameters),
    PointAttractor(PointAttractorParameters),
    PointRepeller(PointRepellerParameters),
    DoublePendulum(DoublePendulumParameters),
}

/// Expands `$body` once per variant with `$p` bound to the inner struct
macro_rules! with_parameters {
    ($params:expr, $p:ident => $body:expr) => {
        match $params {
            Parameters::Lorenz($p) => $body,
            Parameters::Rossler($p) => $body,
            Parameters::VanDerPol($p) => $body,
            Parameters::PointAttractor($p) => $body,
            Parameters::PointRepeller($p) => $body,
            Parameters::DoublePendulum($p) => $body,
        }
    };
}

impl Parameters {
    pub fn kind(&self) -> SystemKind {
        match self {
            Parameters::Lorenz(_) => SystemKind::Lorenz,
            Parameters::Rossler(_) => SystemKind::Rossler,
            Parameters::VanDerPol(_) => SystemKind::VanDerPol,
            Parameters::PointAttractor(_) => SystemKind::PointAttractor,
            Parameters::PointRepeller(_) => SystemKind::PointRepeller,
            Parameters::DoublePendulum(_) => SystemKind::DoublePendulum,
        }
    }

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Parameters::Lorenz(_) => LorenzParameters::NAMES,
            Parameters::Rossler(_) => RosslerParameters::NAMES,
            Parameters::VanDerPol(_) => VanDerPolParameters::NAMES,
            Parameters::PointAttractor(_) => PointAttractorParameters::NAMES,
            Parameters::PointRepeller(_) => PointRepellerParameters::NAMES,
            Parameters::DoublePendulum(_) => DoublePendulumParameters::NAMES,
        }
    }

    pub fn get(&self, name: &str) -> Option<Scalar> {
        with_parameters!(self, p => p.get(name))
    }

    /// Returns `false` when `name` is not a parameter of this system
    pub fn set(&mut self, name: &str, value: Scalar) -> bool {
        with_parameters!(self, p => p.set(name, value))
    }

    pub fn to_map(&self) -> BTreeMap<String, Scalar> {
        with_parameters!(self, p => p.to_map())
    }

    /// Applies every entry of `updates` or none of them
    ///
    /// Values must be finite but are not checked for plausibility; a
    /// negative mass is accepted and shows up later as instability if it
    /// makes the equations singular.
    pub fn merge(&mut self, updates: &BTreeMap<String, Scalar>) -> Result<(), SimulationError> {
        let mut merged = *self;
        for (name, &value) in updates {
            if !value.is_finite() {
                return Err(SimulationError::configuration(format!(
                    "parameter '{name}' for {} must be a finite number, got {value}",
                    self.kind()
                )));
            }
            if !merged.set(name, value) {
                return Err(SimulationError::configuration(format!(
                    "unknown parameter '{name}' for {} (expected one of: {})",
                    self.kind(),
                    self.names().join(", ")
                )));
            }
        }
        *self = merged;
        Ok(())
    }

    /// Time derivative of `state`
    pub fn derivative(
        &self,
        state: &SystemState,
        time: Scalar,
    ) -> Result<SystemState, SimulationError> {
        match (self, state) {
            (Parameters::DoublePendulum(p), SystemState::Pendulum(s)) => {
                p.derivative(s, time).map(SystemState::Pendulum)
            }
            (Parameters::DoublePendulum(_), _) | (_, SystemState::Pendulum(_)) => {
                Err(self.mismatch(state))
            }
            (_, SystemState::Attractor(s)) => {
                let field = self.attractor_field().ok_or_else(|| self.mismatch(state))?;
                field.derivative(s, time).map(SystemState::Attractor)
            }
        }
    }

    /// One fixed step of `integrator` from `state` at `time`
    pub fn advance(
        &self,
        integrator: IntegratorKind,
        state: &SystemState,
        time: Scalar,
        dt: Scalar,
    ) -> Result<SystemState, SimulationError> {
        match (self, state) {
            (Parameters::DoublePendulum(p), SystemState::Pendulum(s)) => integrator
                .advance(s, p, time, dt)
                .map(SystemState::Pendulum),
            (_, SystemState::Attractor(s)) => match self.attractor_field() {
                Some(field) => integrator
                    .advance(s, field, time, dt)
                    .map(SystemState::Attractor),
                None => Err(self.mismatch(state)),
            },
            _ => Err(self.mismatch(state)),
        }
    }

    fn attractor_field(&self) -> Option<&dyn VectorField<3>> {
        match self {
            Parameters::Lorenz(p) => Some(p),
            Parameters::Rossler(p) => Some(p),
            Parameters::VanDerPol(p) => Some(p),
            Parameters::PointAttractor(p) => Some(p),
            Parameters::PointRepeller(p) => Some(p),
            Parameters::DoublePendulum(_) => None,
        }
    }

    fn mismatch(&self, state: &SystemState) -> SimulationError {
        SimulationError::configuration(format!(
            "{} expects {} state components, got {}",
            self.kind(),
            self.kind().dimension(),
            state.as_slice().len()
        ))
    }
}

/// State of the active system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemState {
    /// `(x, y, z)`
    Attractor(StateVector<3>),
    /// `(θ1, ω1, θ2, ω2)`
    Pendulum(StateVector<4>),
}

impl SystemState {
    pub fn as_slice(&self) -> &[Scalar] {
        match self {
            SystemState::Attractor(s) => s,
            SystemState::Pendulum(s) => s,
        }
    }

    pub fn is_finite(&self) -> bool {
        all_finite(self.as_slice())
    }

    /// Builds the state for `kind` from a flat component list
    pub fn from_components(
        kind: SystemKind,
        components: &[Scalar],
    ) -> Result<Self, SimulationError> {
        if !all_finite(components) {
            return Err(SimulationError::configuration(format!(
                "state for {kind} contains non-finite values"
            )));
        }

        let wrong_length = || {
            SimulationError::configuration(format!(
                "{kind} expects {} state components, got {}",
                kind.dimension(),
                components.len()
            ))
        };

        match kind {
            SystemKind::DoublePendulum => components
                .try_into()
                .map(SystemState::Pendulum)
                .map_err(|_| wrong_length()),
            _ => components
                .try_into()
                .map(SystemState::Attractor)
                .map_err(|_| wrong_length()),
        }
    }
}
