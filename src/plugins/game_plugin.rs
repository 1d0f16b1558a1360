use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::{
    animator::{AnimationSync, AnimatorParameters, DogPose},
    components::*,
    events::JumpAccepted,
    intent,
    locomotion::Locomotion,
    motor::KinematicBody,
    physics,
};
use crate::input::dispatch::ActionTracker;

// ── SystemSets (strict per-frame ordering) ──────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Devices → action messages.
    Input,
    /// Action messages → locomotion latches and jump requests.
    Intent,
    /// Locomotion tick + motor.
    Motion,
    /// Locomotion → animator parameters → pose.
    Animation,
    /// Camera and HUD.
    Presentation,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<JumpAccepted>();
        app.init_state::<GamePhase>();

        app.configure_sets(
            Update,
            (
                FrameSet::Input,
                FrameSet::Intent,
                FrameSet::Motion,
                FrameSet::Animation,
                FrameSet::Presentation,
            )
                .chain(),
        );

        // Intent — routing is paused with the game, releasing is not.
        app.add_systems(
            Update,
            (
                intent::release_controls,
                intent::apply_player_actions.run_if(in_state(GamePhase::Playing)),
            )
                .chain()
                .in_set(FrameSet::Intent),
        );

        // Motion
        app.add_systems(
            Update,
            physics::integrate_locomotion
                .in_set(FrameSet::Motion)
                .run_if(in_state(GamePhase::Playing)),
        );

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(Update, (toggle_pause, tuning_reload_input));
    }
}

/// Gameplay components of the dog (no visuals).
pub fn dog_bundle(transform: Transform) -> impl Bundle {
    (
        Player,
        Controllable,
        transform,
        Visibility::default(),
        KinematicBody::on_ground(transform.translation.y),
        Locomotion::new(transform.rotation.to_euler(EulerRot::YXZ).0, Quat::IDENTITY),
        AnimatorParameters::default(),
        AnimationSync::default(),
        DogPose::default(),
    )
}

// ── Always-on ───────────────────────────────────────────────────────

/// Escape pauses: the dog loses [`Controllable`] until resumed.
fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GamePhase>>,
    mut next_state: ResMut<NextState<GamePhase>>,
    mut tracker: ResMut<ActionTracker>,
    mut commands: Commands,
    players: Query<Entity, With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    match state.get() {
        GamePhase::Playing => {
            next_state.set(GamePhase::Paused);
            for entity in &players {
                commands.entity(entity).remove::<Controllable>();
            }
            info!("Paused");
        }
        GamePhase::Paused => {
            next_state.set(GamePhase::Playing);
            for entity in &players {
                commands.entity(entity).insert(Controllable);
            }
            tracker.reset();
            info!("Resumed");
        }
    }
}

/// Reload tuning with F5.
fn tuning_reload_input(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<Tuning>) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}
