//! Runge-Kutta integration methods

use super::{Integrator, VectorField};
use crate::error::SimulationError;
use crate::physics::math::{Scalar, StateVector, add_scaled};

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// A classic multi-stage integrator that provides fourth-order accuracy
/// by combining four intermediate evaluations of the derivative. Used for
/// the double pendulum, whose conservative dynamics diverge visibly under
/// Euler.
///
/// The RK4 algorithm:
/// 1. k1 = f(t, y)
/// 2. k2 = f(t + dt/2, y + k1*dt/2)
/// 3. k3 = f(t + dt/2, y + k2*dt/2)
/// 4. k4 = f(t + dt, y + k3*dt)
/// 5. y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
///
/// RK4 is not symplectic, so energy is not conserved exactly, but for the
/// step sizes used here the drift stays small and bounded over thousands
/// of steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl<const N: usize> Integrator<N> for RungeKuttaFourthOrder {
    fn advance(
        &self,
        state: &StateVector<N>,
        field: &dyn VectorField<N>,
        time: Scalar,
        dt: Scalar,
    ) -> Result<StateVector<N>, SimulationError> {
        let half_dt = dt * 0.5;

        let k1 = field.derivative(state, time)?;
        let k2 = field.derivative(&add_scaled(state, &k1, half_dt), time + half_dt)?;
        let k3 = field.derivative(&add_scaled(state, &k2, half_dt), time + half_dt)?;
        let k4 = field.derivative(&add_scaled(state, &k3, dt), time + dt)?;

        Ok(std::array::from_fn(|i| {
            state[i] + (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) * (dt / 6.0)
        }))
    }
}
