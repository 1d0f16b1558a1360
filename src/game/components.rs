use bevy::math::EulerRot;
use bevy::prelude::*;

use super::types::Seconds;

// ── Marker components ───────────────────────────────────────────────

/// The dog.
#[derive(Component)]
pub struct Player;

/// Receives logical input. Removing it unsubscribes the entity and cancels
/// anything its input had scheduled.
#[derive(Component)]
pub struct Controllable;

/// Visual body child, posed by the animator.
#[derive(Component)]
pub struct DogBody;

// ── Game phase state ────────────────────────────────────────────────

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
}

// ── Camera ──────────────────────────────────────────────────────────

/// Orbit camera following `target`.
#[derive(Component, Debug)]
pub struct FollowCamera {
    pub target: Entity,
    pub yaw: f32,
    pub pitch: f32,
    /// Latest CameraControl value (zero after cancel).
    pub look: Vec2,
    pub look_from_gamepad: bool,
}

impl FollowCamera {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            yaw: 0.0,
            pitch: -0.35,
            look: Vec2::ZERO,
            look_from_gamepad: false,
        }
    }

    /// Rotation of the camera looking at its target.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

// ── HUD ─────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct HelpPanel;

/// Hides the help panel once it runs out, unless Help input arrives first.
#[derive(Component)]
pub struct HelpAutoHide(pub Seconds);

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct PauseBanner;
