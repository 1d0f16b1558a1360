use bevy::prelude::*;

use super::game_plugin::FrameSet;
use crate::config::tuning::Tuning;
use crate::game::components::{FollowCamera, GamePhase, Player};
use crate::input::actions::{Action, ActionMessage, ActionPhase};
use crate::input::bindings::ControlScheme;

/// Orbit camera that follows its target and is steered by CameraControl.
pub struct FollowCameraPlugin;

impl Plugin for FollowCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                read_camera_input,
                orbit_camera.run_if(in_state(GamePhase::Playing)),
                follow_target,
            )
                .chain()
                .in_set(FrameSet::Presentation),
        );
    }
}

fn read_camera_input(mut actions: MessageReader<ActionMessage>, mut cameras: Query<&mut FollowCamera>) {
    for msg in actions.read().filter(|m| m.action == Action::CameraControl) {
        let look = match msg.phase {
            ActionPhase::Performed(value) => value.axis2d(),
            ActionPhase::Canceled => Vec2::ZERO,
        };
        for mut cam in &mut cameras {
            cam.look = look;
            cam.look_from_gamepad = msg.scheme == Some(ControlScheme::Gamepad);
        }
    }
}

/// Turn `look` into a yaw/pitch change. Mouse deltas are already per-frame;
/// stick deflection is a rate and scales with `dt`.
pub fn apply_look(cam: &mut FollowCamera, tuning: &Tuning, dt: f32) {
    let delta = if cam.look_from_gamepad {
        Vec2::new(cam.look.x, -cam.look.y) * tuning.stick_sensitivity * dt
    } else {
        cam.look * tuning.mouse_sensitivity
    };
    cam.yaw -= delta.x;
    cam.pitch = (cam.pitch - delta.y).clamp(tuning.camera_min_pitch, tuning.camera_max_pitch);
}

fn orbit_camera(time: Res<Time>, tuning: Res<Tuning>, mut cameras: Query<&mut FollowCamera>) {
    let dt = time.delta_secs();
    for mut cam in &mut cameras {
        // `look` holds until canceled, so a steady mouse drag keeps turning.
        if cam.look != Vec2::ZERO {
            apply_look(&mut cam, &tuning, dt);
        }
    }
}

fn follow_target(
    tuning: Res<Tuning>,
    targets: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<(&FollowCamera, &mut Transform)>,
) {
    for (cam, mut transform) in &mut cameras {
        let Ok(target) = targets.get(cam.target) else {
            continue;
        };
        let rotation = cam.rotation();
        let pivot = target.translation + Vec3::Y * tuning.camera_height;
        transform.translation = pivot + rotation * Vec3::Z * tuning.camera_distance;
        transform.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FollowCamera {
        FollowCamera::new(Entity::PLACEHOLDER)
    }

    #[test]
    fn mouse_right_turns_right_and_pitch_clamps() {
        let tuning = Tuning::default();
        let mut cam = camera();
        cam.look = Vec2::new(100.0, 0.0);
        apply_look(&mut cam, &tuning, 0.016);
        assert!((cam.yaw + 0.4).abs() < 1e-5);

        cam.look = Vec2::new(0.0, 10_000.0);
        apply_look(&mut cam, &tuning, 0.016);
        assert_eq!(cam.pitch, tuning.camera_min_pitch);
    }

    #[test]
    fn stick_up_looks_up_at_frame_rate() {
        let tuning = Tuning::default();
        let mut cam = camera();
        let start = cam.pitch;
        cam.look = Vec2::Y * 0.1;
        cam.look_from_gamepad = true;
        apply_look(&mut cam, &tuning, 0.5);
        assert!((cam.pitch - (start + 0.1 * tuning.stick_sensitivity * 0.5)).abs() < 1e-5);
    }

    #[test]
    fn camera_sits_behind_and_above_target() {
        let mut app = App::new();
        app.insert_resource(Tuning::default())
            .add_systems(Update, follow_target);
        let dog = app
            .world_mut()
            .spawn((Player, Transform::from_xyz(1.0, 0.0, 2.0)))
            .id();
        let cam = app
            .world_mut()
            .spawn((FollowCamera::new(dog), Transform::default()))
            .id();
        app.update();

        let tf = app.world().get::<Transform>(cam).unwrap();
        assert!(tf.translation.z > 2.0, "behind: {:?}", tf.translation);
        assert!(tf.translation.y > 1.0, "above: {:?}", tf.translation);
        let to_dog = (Vec3::new(1.0, 1.0, 2.0) - tf.translation).normalize();
        assert!(tf.forward().dot(to_dog) > 0.999);
    }
}
