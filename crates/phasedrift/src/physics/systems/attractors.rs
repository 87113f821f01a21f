//! Three-variable systems integrated with explicit Euler
//!
//! Each parameter struct doubles as the system's vector field, so the
//! parameters a session holds are exactly what the integrator evaluates.

use crate::error::SimulationError;
use crate::physics::integrators::VectorField;
use crate::physics::math::{Scalar, StateVector};
use phasedrift_macros::ParameterSet;

/// Lorenz convection model
///
/// ```text
/// dx/dt = σ(y − x)
/// dy/dt = x(ρ − z) − y
/// dz/dt = xy − βz
/// ```
#[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
pub struct LorenzParameters {
    #[default(10.0)]
    pub sigma: Scalar,
    #[default(28.0)]
    pub rho: Scalar,
    #[default(8.0 / 3.0)]
    pub beta: Scalar,
}

impl LorenzParameters {
    pub fn evaluate(&self, [x, y, z]: StateVector<3>) -> StateVector<3> {
        [
            self.sigma * (y - x),
            x * (self.rho - z) - y,
            x * y - self.beta * z,
        ]
    }

    /// The two non-trivial equilibria `C±`, which exist for ρ > 1
    pub fn fixed_points(&self) -> Option<[StateVector<3>; 2]> {
        let radicand = self.beta * (self.rho - 1.0);
        if radicand <= 0.0 {
            return None;
        }
        let r = libm::sqrt(radicand);
        Some([[r, r, self.rho - 1.0], [-r, -r, self.rho - 1.0]])
    }
}

/// Rössler attractor
///
/// ```text
/// dx/dt = −y − z
/// dy/dt = x + ay
/// dz/dt = b + z(x − c)
/// ```
#[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
pub struct RosslerParameters {
    #[default(0.2)]
    pub a: Scalar,
    #[default(0.2)]
    pub b: Scalar,
    #[default(5.7)]
    pub c: Scalar,
}

impl RosslerParameters {
    pub fn evaluate(&self, [x, y, z]: StateVector<3>) -> StateVector<3> {
        [-y - z, x + self.a * y, self.b + z * (x - self.c)]
    }

    /// Equilibria at `x = (c ± √(c² − 4ab)) / 2`, `y = −x/a`, `z = x/a`
    pub fn fixed_points(&self) -> Option<[StateVector<3>; 2]> {
        let discriminant = self.c * self.c - 4.0 * self.a * self.b;
        if discriminant < 0.0 || self.a == 0.0 {
            return None;
        }
        let root = libm::sqrt(discriminant);
        let point = |x: Scalar| [x, -x / self.a, x / self.a];
        Some([point((self.c + root) / 2.0), point((self.c - root) / 2.0)])
    }
}

/// Van der Pol oscillator, padded to three variables
///
/// ```text
/// dx/dt = y
/// dy/dt = μ(1 − x²)y − x
/// dz/dt = 0
/// ```
///
/// The z axis is structurally unused; projections onto it are lines.
#[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
pub struct VanDerPolParameters {
    #[default(1.0)]
    pub mu: Scalar,
}

impl VanDerPolParameters {
    pub fn evaluate(&self, [x, y, _z]: StateVector<3>) -> StateVector<3> {
        [y, self.mu * (1.0 - x * x) * y - x, 0.0]
    }
}

/// Linear sink, `d/dt (x, y, z) = −λ (x, y, z)`
#[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
pub struct PointAttractorParameters {
    #[default(1.0)]
    pub lambda: Scalar,
}

impl PointAttractorParameters {
    pub fn evaluate(&self, state: StateVector<3>) -> StateVector<3> {
        state.map(|c| -self.lambda * c)
    }
}

/// Linear source, `d/dt (x, y, z) = λ (x, y, z)`
#[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
pub struct PointRepellerParameters {
    #[default(1.0)]
    pub lambda: Scalar,
}

impl PointRepellerParameters {
    pub fn evaluate(&self, state: StateVector<3>) -> StateVector<3> {
        state.map(|c| self.lambda * c)
    }
}

macro_rules! infallible_field {
    ($($params:ty),* $(,)?) => {
        $(
            impl VectorField<3> for $params {
                fn derivative(
                    &self,
                    state: &StateVector<3>,
                    _time: Scalar,
                ) -> Result<StateVector<3>, SimulationError> {
                    Ok(self.evaluate(*state))
                }
            }
        )*
    };
}

infallible_field!(
    LorenzParameters,
    RosslerParameters,
    VanDerPolParameters,
    PointAttractorParameters,
    PointRepellerParameters,
);
