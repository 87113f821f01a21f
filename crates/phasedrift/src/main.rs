use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::WindowPlugin;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use clap::Parser;
use phasedrift::cli::{self, Args};
use phasedrift::plugins::simulation::{ActiveSession, SaveSettings, StepSettings, window_title};
use phasedrift::{CameraPlugin, ControlsPlugin, SimulationPlugin, VisualizationPlugin};

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_systems {
        cli::handle_list_systems();
        return AppExit::Success;
    }

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    let session = match cli::build_session(&args, &config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins
            .set(LogPlugin {
                level,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: window_title(session.system()),
                    ..default()
                }),
                ..default()
            }),
        PanOrbitCameraPlugin,
    ));

    match toml::to_string_pretty(&config) {
        Ok(toml_string) => {
            debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
        }
        Err(e) => {
            error!("Failed to serialize configuration to TOML: {}", e);
        }
    }

    app.insert_resource(StepSettings::from(&config));
    app.insert_resource(SaveSettings::from(&config));
    app.insert_resource(ActiveSession(session));
    app.insert_resource(config);

    app.add_plugins((
        SimulationPlugin,
        ControlsPlugin,
        CameraPlugin,
        VisualizationPlugin,
    ));

    app.run()
}
