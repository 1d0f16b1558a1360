use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use super::game_plugin::FrameSet;
use crate::input::actions::ActionMessage;
use crate::input::dispatch::{ActionTracker, DeviceSnapshot};

/// Turns device state into [`ActionMessage`]s once per frame.
pub struct ActionInputPlugin;

impl Plugin for ActionInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ActionMessage>();
        app.init_resource::<ActionTracker>();
        // Runs in every phase so Help and releases are never missed.
        app.add_systems(Update, dispatch_actions.in_set(FrameSet::Input));
    }
}

fn dispatch_actions(
    keys: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mouse: Option<Res<AccumulatedMouseMotion>>,
    mut tracker: ResMut<ActionTracker>,
    mut actions: MessageWriter<ActionMessage>,
) {
    let snapshot = DeviceSnapshot {
        keys: &keys,
        gamepads: gamepads.iter().collect(),
        mouse_delta: mouse.map_or(Vec2::ZERO, |m| m.delta),
    };
    for msg in tracker.poll(&snapshot) {
        trace!("{} {:?}", msg.action.name(), msg.phase);
        actions.write(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::actions::{Action, ActionPhase};

    #[derive(Resource, Default)]
    struct Seen(Vec<ActionMessage>);

    fn record(mut reader: MessageReader<ActionMessage>, mut seen: ResMut<Seen>) {
        seen.0.extend(reader.read().copied());
    }

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Seen>()
            .add_plugins(ActionInputPlugin)
            .add_systems(Update, record.after(FrameSet::Input));
        app
    }

    #[test]
    fn key_press_and_release_become_messages() {
        let mut app = app();
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyH);
        app.update();
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().release(KeyCode::KeyH);
        app.update();

        let seen = &app.world().resource::<Seen>().0;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].action, Action::Help);
        assert!(seen[0].is_performed());
        assert_eq!(seen[1].phase, ActionPhase::Canceled);
    }

    #[test]
    fn mouse_motion_without_resource_is_zero() {
        let mut app = app();
        app.update();
        assert!(app.world().resource::<Seen>().0.is_empty());
    }
}
