//! Centralized event definitions
//!
//! Input handlers translate keys into `SimulationCommand`s; the simulation
//! plugin is the only consumer that mutates the session in response.

use crate::physics::systems::SystemKind;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCommand {
    TogglePause,
    Reset,
    SelectSystem(SystemKind),
    SaveConfiguration,
    Quit,
}
