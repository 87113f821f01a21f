//! Controls plugin - Self-contained plugin pattern
//!
//! Translates keyboard input into `SimulationCommand` events:
//!
//! | Key       | Command                       |
//! |-----------|-------------------------------|
//! | Space     | pause / resume                |
//! | R         | reset to the default state    |
//! | 1–6       | select a system               |
//! | S         | save configuration and log a share URL |
//! | Escape    | quit (native only)            |

use crate::prelude::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SimulationCommand>();
        app.add_systems(Update, keyboard_input_handler);
    }
}

/// System selected by each number key, in menu order
const SYSTEM_KEYS: [KeyCode; 6] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
];

/// Handles keyboard input and emits SimulationCommand events
fn keyboard_input_handler(
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<SimulationCommand>,
) {
    for &keycode in keys.get_just_pressed() {
        if let Some(command) = command_for_key(keycode) {
            commands.write(command);
        }
    }
}

fn command_for_key(keycode: KeyCode) -> Option<SimulationCommand> {
    match keycode {
        KeyCode::Space => Some(SimulationCommand::TogglePause),
        KeyCode::KeyR => Some(SimulationCommand::Reset),
        KeyCode::KeyS => Some(SimulationCommand::SaveConfiguration),
        #[cfg(not(target_arch = "wasm32"))]
        KeyCode::Escape => Some(SimulationCommand::Quit),
        _ => SYSTEM_KEYS
            .iter()
            .position(|&key| key == keycode)
            .and_then(|index| SystemKind::from_index(index + 1))
            .map(SimulationCommand::SelectSystem),
    }
}
