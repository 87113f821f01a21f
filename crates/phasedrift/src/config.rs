//! Application configuration
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults (the `#[default(...)]` attributes below)
//! 2. `config.toml` in the platform config directory, or an explicit file
//! 3. `PHASEDRIFT__<SECTION>__<KEY>` environment variables, e.g.
//!    `PHASEDRIFT__SIMULATION__TIME_STEP=0.005`

use bevy::log::{info, warn};
use bevy::prelude::Resource;
use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use phasedrift_macros::ConfigDefaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "PHASEDRIFT";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(ConfigDefaults, Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    #[default(SimulationSection::default())]
    pub simulation: SimulationSection,

    #[default(BufferSection::default())]
    pub buffers: BufferSection,

    #[default(RenderingSection::default())]
    pub rendering: RenderingSection,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationSection {
    /// System key to start with (`lorenz`, `rossler`, `vanderpol`,
    /// `attractor`, `repeller` or `pendulum`)
    #[default("lorenz")]
    pub system: String,

    #[default(0.01)]
    pub time_step: f64,

    /// Integrator steps taken per rendered frame
    #[default(1)]
    pub steps_per_frame: u32,

    #[default(false)]
    pub start_paused: bool,

    /// Overrides the per-system default integrator when set
    #[default(None)]
    pub integrator: Option<String>,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BufferSection {
    #[default(1000)]
    pub trajectory_capacity: usize,

    #[default(200)]
    pub time_series_capacity: usize,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderingSection {
    #[default(80.0)]
    pub camera_radius: f32,

    /// World units per simulation unit for the attractor trajectories
    #[default(1.0)]
    pub trajectory_scale: f32,

    /// World units per metre for the pendulum, which is only a few metres across
    #[default(10.0)]
    pub pendulum_scale: f32,

    #[default(true)]
    pub draw_pendulum_rods: bool,

    /// Base URL that share tokens are appended to
    #[default("http://localhost:8080/")]
    pub share_base_url: String,
}

impl AppConfig {
    /// Builds the layered configuration
    ///
    /// An explicit `path` must exist; the per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let file = match path {
            Some(path) => Some((path.to_path_buf(), true)),
            None => Self::user_config_path().map(|path| (path, false)),
        };
        if let Some((path, required)) = file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Like [`Self::load`], falling back to defaults with a warning
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load configuration: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Writes the configuration as pretty TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!("Wrote configuration to {}", path.display());
        Ok(())
    }

    /// Checks values that deserialize fine but cannot be simulated
    pub fn validate(&self) -> Result<(), String> {
        let dt = self.simulation.time_step;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(format!("simulation.time_step must be positive, got {dt}"));
        }
        if self.simulation.steps_per_frame == 0 {
            return Err("simulation.steps_per_frame must be at least 1".to_string());
        }
        if self.buffers.trajectory_capacity == 0 || self.buffers.time_series_capacity == 0 {
            return Err("buffer capacities must be at least 1".to_string());
        }
        Ok(())
    }

    /// `config.toml` in the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

/// Where saved session configurations go
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "phasedrift")
}
