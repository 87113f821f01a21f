//! Command line interface for Phasedrift

use clap::Parser;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::SimulationError;
use crate::persistence::{SessionConfiguration, token_from_url};
use crate::physics::integrators::IntegratorKind;
use crate::physics::systems::SystemKind;
use crate::session::{BufferCapacities, SimulationSession};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Unknown system key
    InvalidSystem(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
    /// Saved configuration or share token could not be applied
    InvalidSession(SimulationError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidSystem(msg) => write!(f, "Invalid system: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
            CliError::InvalidSession(err) => write!(f, "Could not restore session: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidSession(err) => Some(err),
            _ => None,
        }
    }
}

/// Phasedrift - chaotic attractors and the double pendulum in real time
#[derive(Parser, Debug, Default)]
#[command(version = version_string(), about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// System to start with (e.g., lorenz, rossler, pendulum)
    #[arg(short, long, value_name = "KEY")]
    pub system: Option<String>,

    /// Integrator override (e.g., euler, rk4)
    #[arg(short, long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Start paused
    #[arg(short, long)]
    pub paused: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// List available systems and integrators and exit
    #[arg(long)]
    pub list_systems: bool,

    /// Restore a saved session configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Restore a session from a share token or a URL containing one
    #[arg(long, value_name = "TOKEN", conflicts_with = "load")]
    pub share_token: Option<String>,
}

fn version_string() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")")
}

/// Handles the --list-systems flag by printing systems and integrators
pub fn handle_list_systems() {
    println!("Available systems:");
    for (index, kind) in SystemKind::ALL.iter().enumerate() {
        println!(
            "  {}. {:<10} {} ({} variables, default integrator: {})",
            index + 1,
            kind.key(),
            kind.display_name(),
            kind.dimension(),
            kind.default_integrator()
        );
    }

    println!("\nAvailable integrators:");
    for name in IntegratorKind::list_available() {
        println!("  - {name}");
    }

    println!("\nAliases:");
    for (alias, target) in IntegratorKind::list_aliases() {
        println!("  - {alias} -> {target}");
    }
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<AppConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading configuration from: {}", path.display());
            AppConfig::load(Some(path)).map_err(|e| CliError::ConfigLoad(e.to_string()))?
        }
        None => AppConfig::load_or_default(None),
    };

    if let Some(system) = &args.system {
        println!("Overriding system to: {system}");
        config.simulation.system = system.clone();
    }

    if let Some(integrator) = &args.integrator {
        println!("Using integrator: {integrator}");
        config.simulation.integrator = Some(integrator.clone());
    }

    if args.paused {
        config.simulation.start_paused = true;
    }

    config.validate().map_err(CliError::ConfigLoad)?;

    // Fail on unknown names here rather than once the window is up
    SystemKind::from_key(&config.simulation.system)
        .ok_or_else(|| CliError::InvalidSystem(unknown_system(&config.simulation.system)))?;
    if let Some(integrator) = &config.simulation.integrator {
        integrator
            .parse::<IntegratorKind>()
            .map_err(CliError::InvalidIntegrator)?;
    }

    Ok(config)
}

fn unknown_system(key: &str) -> String {
    let keys: Vec<_> = SystemKind::ALL.iter().map(|kind| kind.key()).collect();
    format!("'{key}'. Available systems: {}", keys.join(", "))
}

/// Creates the initial session from the validated configuration, then
/// applies a saved configuration or share token if one was given
pub fn build_session(args: &Args, config: &AppConfig) -> Result<SimulationSession, CliError> {
    let kind = SystemKind::from_key(&config.simulation.system)
        .ok_or_else(|| CliError::InvalidSystem(unknown_system(&config.simulation.system)))?;

    let mut session = SimulationSession::with_capacities(
        kind,
        BufferCapacities {
            trajectory: config.buffers.trajectory_capacity,
            time_series: config.buffers.time_series_capacity,
        },
    );

    if let Some(path) = &args.load {
        println!("Restoring session from: {}", path.display());
        restore_from_file(&mut session, path)?;
    } else if let Some(token) = &args.share_token {
        let token = token_from_url(token).unwrap_or(token);
        session
            .load_share_token(token)
            .map_err(CliError::InvalidSession)?;
    }

    if let Some(name) = &config.simulation.integrator {
        let integrator = name
            .parse::<IntegratorKind>()
            .map_err(CliError::InvalidIntegrator)?;
        session.set_integrator(integrator);
    }

    session.set_running(!config.simulation.start_paused);
    Ok(session)
}

fn restore_from_file(session: &mut SimulationSession, path: &Path) -> Result<(), CliError> {
    let saved = SessionConfiguration::read_from(path).map_err(CliError::InvalidSession)?;
    session.load(&saved).map_err(CliError::InvalidSession)
}
