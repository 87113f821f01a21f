//! Damped double pendulum
//!
//! State is `(θ1, ω1, θ2, ω2)`: joint angles measured from the downward
//! vertical and their angular velocities. Positions use a y-up frame with
//! the pivot at the origin, so a hanging bob sits at negative y.

use crate::error::SimulationError;
use crate::physics::integrators::VectorField;
use crate::physics::math::{Scalar, StateVector, Vector, all_finite};
use phasedrift_macros::ParameterSet;

/// Below this the shared denominator `m1 + m2·sin²Δ` is treated as zero
pub const SINGULARITY_EPSILON: Scalar = 1e-12;

pub const DISPLAY_NAME: &str = "Double Pendulum";

#[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
pub struct DoublePendulumParameters {
    #[default(1.0)]
    pub m1: Scalar,
    #[default(1.0)]
    pub m2: Scalar,
    #[default(1.0)]
    pub l1: Scalar,
    #[default(1.0)]
    pub l2: Scalar,
    #[default(9.81)]
    pub g: Scalar,
    #[default(0.0)]
    pub damping: Scalar,
}

impl VectorField<4> for DoublePendulumParameters {
    /// Lagrangian equations of motion with linear joint damping
    ///
    /// With `Δ = θ1 − θ2` and `D = m1 + m2 − m2·cos²Δ`:
    ///
    /// ```text
    /// α1 = (m2 g sinθ2 cosΔ − m2 sinΔ (l1 ω1² cosΔ + l2 ω2²) − (m1+m2) g sinθ1) / (l1 D) − c ω1
    /// α2 = ((m1+m2)(l1 ω1² sinΔ − g sinθ2 + g sinθ1 cosΔ) + m2 l2 ω2² sinΔ cosΔ) / (l2 D) − c ω2
    /// ```
    fn derivative(
        &self,
        state: &StateVector<4>,
        time: Scalar,
    ) -> Result<StateVector<4>, SimulationError> {
        let Self {
            m1,
            m2,
            l1,
            l2,
            g,
            damping,
        } = *self;
        let [theta1, omega1, theta2, omega2] = *state;

        let delta = theta1 - theta2;
        let (sin_delta, cos_delta) = (libm::sin(delta), libm::cos(delta));
        let (sin1, sin2) = (libm::sin(theta1), libm::sin(theta2));
        let total_mass = m1 + m2;

        let reduced = total_mass - m2 * cos_delta * cos_delta;
        let denominator1 = l1 * reduced;
        let denominator2 = l2 * reduced;

        if !(denominator1.abs() >= SINGULARITY_EPSILON && denominator2.abs() >= SINGULARITY_EPSILON)
        {
            return Err(SimulationError::instability(
                DISPLAY_NAME,
                time,
                format!(
                    "singular equations of motion (denominators {denominator1:e}, {denominator2:e})"
                ),
            ));
        }

        let numerator1 = m2 * g * sin2 * cos_delta
            - m2 * sin_delta * (l1 * omega1 * omega1 * cos_delta + l2 * omega2 * omega2)
            - total_mass * g * sin1;
        let numerator2 = total_mass
            * (l1 * omega1 * omega1 * sin_delta - g * sin2 + g * sin1 * cos_delta)
            + m2 * l2 * omega2 * omega2 * sin_delta * cos_delta;

        let alpha1 = numerator1 / denominator1 - damping * omega1;
        let alpha2 = numerator2 / denominator2 - damping * omega2;

        let derivative = [omega1, alpha1, omega2, alpha2];
        if !all_finite(&derivative) {
            return Err(SimulationError::instability(
                DISPLAY_NAME,
                time,
                "non-finite angular acceleration",
            ));
        }

        Ok(derivative)
    }
}

/// Total mechanical energy `T + V`
///
/// Kinetic energy includes the coupling term between the two links;
/// potential energy is measured from the pivot height, so it is zero with
/// both links horizontal and negative when hanging.
pub fn energy(state: &StateVector<4>, params: &DoublePendulumParameters) -> Scalar {
    let [theta1, omega1, theta2, omega2] = *state;
    let DoublePendulumParameters {
        m1, m2, l1, l2, g, ..
    } = *params;

    let v1 = l1 * omega1;
    let v2 = l2 * omega2;
    let kinetic = 0.5 * m1 * v1 * v1
        + 0.5 * m2 * (v1 * v1 + v2 * v2 + 2.0 * v1 * v2 * libm::cos(theta1 - theta2));

    let y1 = -l1 * libm::cos(theta1);
    let y2 = y1 - l2 * libm::cos(theta2);
    let potential = m1 * g * y1 + m2 * g * y2;

    kinetic + potential
}

/// Energy scale `g·(m1·l1 + m2·(l1 + l2))`, the depth of the hanging rest
/// configuration below the pivot
pub fn characteristic_energy(params: &DoublePendulumParameters) -> Scalar {
    params.g * (params.m1 * params.l1 + params.m2 * (params.l1 + params.l2))
}

/// Joint positions for drawing the linkage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumJoints {
    pub pivot: Vector,
    pub bob1: Vector,
    pub bob2: Vector,
}

/// Forward kinematics in the z = 0 plane
pub fn joints(state: &StateVector<4>, params: &DoublePendulumParameters) -> PendulumJoints {
    let [theta1, _, theta2, _] = *state;
    let bob1 = Vector::new(
        params.l1 * libm::sin(theta1),
        -params.l1 * libm::cos(theta1),
        0.0,
    );
    let bob2 = bob1
        + Vector::new(
            params.l2 * libm::sin(theta2),
            -params.l2 * libm::cos(theta2),
            0.0,
        );

    PendulumJoints {
        pivot: Vector::ZERO,
        bob1,
        bob2,
    }
}
