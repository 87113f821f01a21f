//! Phasedrift prelude module
//!
//! Re-exports the types most plugins and tests need.

pub use bevy::prelude::*;

pub use crate::config::AppConfig;
pub use crate::error::SimulationError;
pub use crate::events::SimulationCommand;
pub use crate::physics::integrators::IntegratorKind;
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::systems::{Parameters, SystemKind, SystemState};
pub use crate::plugins::simulation::{ActiveSession, StepSettings};
pub use crate::session::SimulationSession;
