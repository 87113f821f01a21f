//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the `ActiveSession` resource, steps it once per frame and applies
//! `SimulationCommand` events to it. The session itself knows nothing about
//! Bevy; this plugin is the only place the two meet.

use crate::config::{self, AppConfig};
use crate::persistence::SessionConfiguration;
use crate::prelude::*;
use bevy::window::PrimaryWindow;
use std::path::PathBuf;

/// The session driven by the viewer
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct ActiveSession(pub SimulationSession);

/// How far the session advances each frame
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StepSettings {
    pub time_step: Scalar,
    pub steps_per_frame: u32,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            steps_per_frame: 1,
        }
    }
}

impl From<&AppConfig> for StepSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            time_step: config.simulation.time_step,
            steps_per_frame: config.simulation.steps_per_frame,
        }
    }
}

/// Where `SaveConfiguration` writes and which URL the share token is logged with
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SaveSettings {
    pub directory: Option<PathBuf>,
    pub share_base_url: String,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            directory: config::data_dir(),
            share_base_url: AppConfig::default().rendering.share_base_url,
        }
    }
}

impl From<&AppConfig> for SaveSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            directory: config::data_dir(),
            share_base_url: config.rendering.share_base_url.clone(),
        }
    }
}

/// Primary window title for a session running `kind`
pub fn window_title(kind: SystemKind) -> String {
    format!("Phasedrift - {}", kind.display_name())
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Commands,
    Step,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // main inserts configured values first; these only fill gaps
        app.init_resource::<ActiveSession>();
        app.init_resource::<StepSettings>();
        app.init_resource::<SaveSettings>();
        app.add_event::<SimulationCommand>();

        app.configure_sets(Update, (SimulationSet::Commands, SimulationSet::Step).chain());
        app.add_systems(
            Update,
            (
                handle_simulation_commands.in_set(SimulationSet::Commands),
                advance_simulation.in_set(SimulationSet::Step),
                sync_window_title.after(SimulationSet::Commands),
            ),
        );
    }
}

fn handle_simulation_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    mut session: ResMut<ActiveSession>,
    save_settings: Res<SaveSettings>,
    mut exit: EventWriter<AppExit>,
) {
    for command in commands_reader.read() {
        match *command {
            SimulationCommand::TogglePause => {
                let running = session.toggle_running();
                info!("Simulation {}", if running { "resumed" } else { "paused" });
            }
            SimulationCommand::Reset => session.reset(),
            SimulationCommand::SelectSystem(kind) => session.select(kind),
            SimulationCommand::SaveConfiguration => save_configuration(&session, &save_settings),
            SimulationCommand::Quit => {
                exit.write(AppExit::Success);
            }
        }
    }
}

fn save_configuration(session: &SimulationSession, settings: &SaveSettings) {
    let saved = SessionConfiguration::capture(session);

    match &settings.directory {
        Some(directory) => {
            if let Err(e) = saved.save_in(directory, session.system()) {
                error!("Failed to save configuration: {e}");
            }
        }
        None => warn!("No data directory available; configuration not written"),
    }

    match saved.share_url(&settings.share_base_url) {
        Ok(url) => info!("Share URL: {url}"),
        Err(e) => error!("Failed to encode share token: {e}"),
    }
}

fn sync_window_title(
    session: Res<ActiveSession>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !session.is_changed() {
        return;
    }

    let title = window_title(session.system());
    for mut window in &mut windows {
        if window.title != title {
            window.title.clone_from(&title);
        }
    }
}

fn advance_simulation(mut session: ResMut<ActiveSession>, settings: Res<StepSettings>) {
    if !session.is_running() {
        return;
    }

    for _ in 0..settings.steps_per_frame {
        if let Err(e) = session.step(settings.time_step) {
            // Instabilities are already logged by the session
            if !e.is_instability() {
                error!("Simulation step failed: {e}");
            }
            break;
        }
    }
}
