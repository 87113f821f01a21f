//! Camera plugin - Self-contained plugin pattern
//!
//! Spawns an orbit camera looking at the origin. Selecting a system re-aims
//! it at where that system lives, since the Lorenz attractor sits well
//! above the plane while the others are centred on it.

use crate::plugins::visualization::system_focus;
use crate::prelude::*;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy_panorbit_camera::PanOrbitCamera;

/// Plugin that handles camera setup and control
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
        app.add_systems(Update, refocus_on_system_change);
    }
}

fn spawn_camera(
    mut commands: Commands,
    session: Res<ActiveSession>,
    config: Option<Res<AppConfig>>,
) {
    let config = config.as_deref().cloned().unwrap_or_default();

    commands.spawn((
        Name::new("Main Camera"),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            hdr: true,
            ..default()
        },
        Camera3d::default(),
        Tonemapping::AcesFitted,
        Msaa::Sample4,
        PanOrbitCamera {
            allow_upside_down: true,
            focus: system_focus(session.system(), &config),
            pan_smoothness: 0.0,
            radius: Some(config.rendering.camera_radius),
            ..default()
        },
    ));
}

fn refocus_on_system_change(
    session: Res<ActiveSession>,
    config: Option<Res<AppConfig>>,
    mut last_system: Local<Option<SystemKind>>,
    mut cameras: Query<&mut PanOrbitCamera>,
) {
    let system = session.system();
    if *last_system == Some(system) {
        return;
    }
    let first_run = last_system.is_none();
    *last_system = Some(system);
    if first_run {
        return;
    }

    let config = config.as_deref().cloned().unwrap_or_default();
    for mut camera in &mut cameras {
        camera.target_focus = system_focus(system, &config);
        camera.force_update = true;
    }
}
