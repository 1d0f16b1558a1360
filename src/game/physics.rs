use bevy::prelude::*;

use super::components::{FollowCamera, Player};
use super::locomotion::{Locomotion, LocomotionSettings, TickContext};
use super::motor::{CharacterMotor, KinematicBody};
use crate::config::tuning::Tuning;

/// Advance locomotion one frame and move each character through its motor.
pub fn integrate_locomotion(
    time: Res<Time>,
    tuning: Res<Tuning>,
    cameras: Query<(&FollowCamera, &Transform), Without<Player>>,
    mut query: Query<(Entity, &mut Transform, &mut Locomotion, &mut KinematicBody), With<Player>>,
) {
    let settings = LocomotionSettings::from(&*tuning);
    let dt = time.delta_secs();

    for (entity, mut transform, mut loco, mut body) in &mut query {
        let camera_rotation = cameras
            .iter()
            .find(|(cam, _)| cam.target == entity)
            .map_or(Quat::IDENTITY, |(_, tf)| tf.rotation);

        let ctx = TickContext {
            dt,
            grounded: body.is_grounded(),
            camera_rotation,
        };
        let out = loco.tick(&settings, &ctx);
        if out.jumped {
            debug!("Jump impulse applied to {entity}");
        }

        body.move_by(&mut transform.translation, out.displacement);
        transform.rotation = out.facing;
    }
}
