//! Explicit Euler integration method (forward Euler)
//!
//! WARNING: This integrator is first-order accurate and not energy
//! preserving. It is the default for the attractor systems because those
//! are dissipative or chaotic anyway and the trajectory is only ever
//! looked at, but conservative systems drift visibly under it.

use super::{Integrator, VectorField};
use crate::error::SimulationError;
use crate::physics::math::{Scalar, StateVector, add_scaled};

/// Explicit Euler integrator (forward Euler method)
///
/// # Algorithm
///
/// ```text
/// y(t+dt) = y(t) + dt * f(y(t), t)
/// ```
///
/// # Mathematical Properties
///
/// - **Order of accuracy**: O(dt) global error
/// - **Derivative evaluations**: 1 per timestep
/// - **Stability**: Conditionally stable (small stability region)
/// - **Symplectic**: No
///
/// For the point attractor `f(y) = -λy` one step is exactly
/// `y * (1 - λ dt)`, which makes the method easy to check by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl<const N: usize> Integrator<N> for ExplicitEuler {
    fn advance(
        &self,
        state: &StateVector<N>,
        field: &dyn VectorField<N>,
        time: Scalar,
        dt: Scalar,
    ) -> Result<StateVector<N>, SimulationError> {
        let slope = field.derivative(state, time)?;
        Ok(add_scaled(state, &slope, dt))
    }
}
