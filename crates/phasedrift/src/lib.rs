//! Phasedrift library
//!
//! The simulation engine (systems, integrators, session and history
//! buffers) plus the Bevy plugins used by the `phasedrift` viewer. The
//! engine modules have no dependency on the plugins.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod persistence;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod session;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used items
pub use config::AppConfig;
pub use error::SimulationError;
pub use events::SimulationCommand;
pub use persistence::SessionConfiguration;
pub use physics::{
    integrators::{Integrator, IntegratorKind, VectorField},
    math::{Scalar, StateVector, Vector},
    systems::{Parameters, SystemKind, SystemState},
};
pub use plugins::{
    camera::CameraPlugin, controls::ControlsPlugin, simulation::SimulationPlugin,
    visualization::VisualizationPlugin,
};
pub use session::SimulationSession;
