//! Errors raised by the simulation engine

use crate::physics::math::Scalar;
use std::fmt;

/// Every failure the engine reports. None of them is fatal: a session
/// recovers from all of them through `reset` or `initialize`.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Unknown system key or name
    InvalidSystem(String),
    /// Malformed or unrecognized configuration payload
    InvalidConfiguration(String),
    /// Non-finite state or a singular equation of motion
    NumericalInstability {
        system: &'static str,
        time: Scalar,
        reason: String,
    },
    /// Time step that is not a positive finite number
    InvalidTimeStep(Scalar),
}

impl SimulationError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn instability(system: &'static str, time: Scalar, reason: impl Into<String>) -> Self {
        Self::NumericalInstability {
            system,
            time,
            reason: reason.into(),
        }
    }

    pub fn is_instability(&self) -> bool {
        matches!(self, Self::NumericalInstability { .. })
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidSystem(name) => write!(f, "Unknown system: '{name}'"),
            SimulationError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {msg}")
            }
            SimulationError::NumericalInstability {
                system,
                time,
                reason,
            } => write!(f, "Numerical instability in {system} at t={time:.4}: {reason}"),
            SimulationError::InvalidTimeStep(dt) => {
                write!(f, "Time step must be positive and finite, got {dt}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
