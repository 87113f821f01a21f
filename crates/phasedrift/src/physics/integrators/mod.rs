//! Fixed-step integration methods for the simulated systems

use crate::error::SimulationError;
use crate::physics::math::{Scalar, StateVector};
use std::fmt;
use std::str::FromStr;

pub mod explicit_euler;
pub mod runge_kutta;

pub use explicit_euler::ExplicitEuler;
pub use runge_kutta::RungeKuttaFourthOrder;

/// Right-hand side of a first-order ODE system
///
/// Implementations are pure: the same `(state, time)` always yields the
/// same derivative. Evaluation fails only when the equations themselves are
/// singular at `state`.
pub trait VectorField<const N: usize> {
    fn derivative(
        &self,
        state: &StateVector<N>,
        time: Scalar,
    ) -> Result<StateVector<N>, SimulationError>;
}

/// Advances a state by one fixed time step
///
/// Integrators hold no state of their own, so repeated calls with the same
/// arguments produce identical results.
pub trait Integrator<const N: usize> {
    fn advance(
        &self,
        state: &StateVector<N>,
        field: &dyn VectorField<N>,
        time: Scalar,
        dt: Scalar,
    ) -> Result<StateVector<N>, SimulationError>;
}

/// The integrators a session can run
///
/// Each kind is self-describing (canonical name, aliases, convergence
/// order), which lets the CLI and the configuration file select one by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegratorKind {
    ExplicitEuler,
    RungeKuttaFourthOrder,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 2] = [
        IntegratorKind::ExplicitEuler,
        IntegratorKind::RungeKuttaFourthOrder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntegratorKind::ExplicitEuler => "explicit_euler",
            IntegratorKind::RungeKuttaFourthOrder => "runge_kutta_fourth_order",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            IntegratorKind::ExplicitEuler => &["euler", "forward_euler"],
            IntegratorKind::RungeKuttaFourthOrder => &["rk4", "runge_kutta"],
        }
    }

    pub fn convergence_order(self) -> usize {
        match self {
            IntegratorKind::ExplicitEuler => 1,
            IntegratorKind::RungeKuttaFourthOrder => 4,
        }
    }

    pub fn advance<const N: usize>(
        self,
        state: &StateVector<N>,
        field: &dyn VectorField<N>,
        time: Scalar,
        dt: Scalar,
    ) -> Result<StateVector<N>, SimulationError> {
        match self {
            IntegratorKind::ExplicitEuler => ExplicitEuler.advance(state, field, time, dt),
            IntegratorKind::RungeKuttaFourthOrder => {
                RungeKuttaFourthOrder.advance(state, field, time, dt)
            }
        }
    }

    /// Canonical names, sorted
    pub fn list_available() -> Vec<&'static str> {
        let mut names: Vec<_> = Self::ALL.iter().map(|kind| kind.name()).collect();
        names.sort_unstable();
        names
    }

    /// `(alias, canonical)` pairs, sorted by alias
    pub fn list_aliases() -> Vec<(&'static str, &'static str)> {
        let mut aliases: Vec<_> = Self::ALL
            .iter()
            .flat_map(|kind| kind.aliases().iter().map(move |alias| (*alias, kind.name())))
            .collect();
        aliases.sort_unstable();
        aliases
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.aliases().contains(&name))
            .ok_or_else(|| {
                let aliases: Vec<_> = Self::list_aliases().iter().map(|(a, _)| *a).collect();
                format!(
                    "Unknown integrator: '{}'. Available integrators: {}. Aliases: {}",
                    name,
                    Self::list_available().join(", "),
                    aliases.join(", ")
                )
            })
    }
}
