//! Visualization plugin - Self-contained plugin pattern
//!
//! Draws the session's trajectory as a velocity-coloured gizmo line strip
//! and, for the double pendulum, the rods and bobs. Everything is redrawn
//! from the session's buffers each frame; nothing is spawned.

use crate::physics::systems::PendulumJoints;
use crate::prelude::*;
use bevy::color::palettes::css;

const BOB_RADIUS: f32 = 0.25;

/// Plugin that draws the active session with gizmos
pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (draw_trajectory, draw_pendulum));
    }
}

/// Maps a simulated position into world space
///
/// Attractor coordinates treat `z` as up; Bevy uses `y`. The pendulum
/// already lives in a y-up plane.
pub fn to_world(kind: SystemKind, position: Vector, config: &AppConfig) -> Vec3 {
    match kind {
        SystemKind::DoublePendulum => position.as_vec3() * config.rendering.pendulum_scale,
        _ => {
            let p = position.as_vec3();
            Vec3::new(p.x, p.z, p.y) * config.rendering.trajectory_scale
        }
    }
}

/// Rough centre of each system's trajectory, for aiming the camera
pub fn system_focus(kind: SystemKind, config: &AppConfig) -> Vec3 {
    let centre = match kind {
        SystemKind::Lorenz => Vector::new(0.0, 0.0, 25.0),
        SystemKind::Rossler => Vector::new(0.0, 0.0, 2.0),
        SystemKind::DoublePendulum => Vector::new(0.0, -1.0, 0.0),
        _ => Vector::ZERO,
    };
    to_world(kind, centre, config)
}

fn draw_trajectory(
    mut gizmos: Gizmos,
    session: Res<ActiveSession>,
    config: Option<Res<AppConfig>>,
) {
    let trajectory = session.trajectory();
    if trajectory.len() < 2 {
        return;
    }

    let config = config.as_deref().cloned().unwrap_or_default();
    let kind = session.system();
    gizmos.linestrip_gradient(
        trajectory
            .iter()
            .map(|point| (to_world(kind, point.position, &config), Color::from(point.color))),
    );
}

fn draw_pendulum(
    mut gizmos: Gizmos,
    session: Res<ActiveSession>,
    config: Option<Res<AppConfig>>,
) {
    let Some(PendulumJoints { pivot, bob1, bob2 }) = session.pendulum_joints() else {
        return;
    };

    let config = config.as_deref().cloned().unwrap_or_default();
    if !config.rendering.draw_pendulum_rods {
        return;
    }

    let kind = session.system();
    let [pivot, bob1, bob2] = [pivot, bob1, bob2].map(|p| to_world(kind, p, &config));
    let rod_color = if session.instability().is_some() {
        css::RED
    } else {
        css::LIGHT_GRAY
    };

    gizmos.line(pivot, bob1, rod_color);
    gizmos.line(bob1, bob2, rod_color);
    for bob in [bob1, bob2] {
        gizmos.sphere(Isometry3d::from_translation(bob), BOB_RADIUS, css::WHITE);
    }
}
