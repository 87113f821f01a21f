//! Plugin modules for the Phasedrift viewer
//!
//! Each plugin is self-contained and only talks to the others through
//! `SimulationCommand` events and the `ActiveSession` resource.

pub mod camera;
pub mod controls;
pub mod simulation;
pub mod visualization;
