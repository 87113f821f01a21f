//! Test utilities for plugin testing

use crate::prelude::*;

/// Creates a headless app with the resources the plugins expect
///
/// Keyboard state is a bare `ButtonInput` resource without `InputPlugin`,
/// so keys pressed by [`press_key`] stay "just pressed" for the next update.
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(AppConfig::default());
    app.add_event::<SimulationCommand>();
    app
}

/// Helper to simulate a key press
pub fn press_key(app: &mut App, key: KeyCode) {
    let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    input.clear();
    input.press(key);
}

/// Every `SimulationCommand` still held in the event queue, oldest first
pub fn sent_commands(app: &App) -> Vec<SimulationCommand> {
    let events = app.world().resource::<Events<SimulationCommand>>();
    events.iter_current_update_events().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.world().contains_resource::<Time>());
        assert!(app.world().contains_resource::<ButtonInput<KeyCode>>());
        assert!(app.world().contains_resource::<AppConfig>());
    }

    #[test]
    fn test_press_key() {
        let mut app = create_test_app();
        press_key(&mut app, KeyCode::Space);

        let input = app.world().resource::<ButtonInput<KeyCode>>();
        assert!(input.pressed(KeyCode::Space));
        assert!(input.just_pressed(KeyCode::Space));
    }

    #[test]
    fn test_sent_commands() {
        let mut app = create_test_app();
        app.world_mut().send_event(SimulationCommand::Reset);
        assert_eq!(sent_commands(&app), vec![SimulationCommand::Reset]);
    }
}
