use bevy::prelude::*;

use super::game_plugin::FrameSet;
use crate::config::tuning::Tuning;
use crate::game::{
    animator::{AnimationInputs, AnimationSync, AnimatorParameters, DogPose},
    components::DogBody,
    events::JumpAccepted,
    locomotion::{Locomotion, LocomotionSettings},
    motor::{CharacterMotor, KinematicBody},
};

/// Rest height of the body mesh above the dog's root.
pub const BODY_HEIGHT: f32 = 0.45;

/// Feeds locomotion into animator parameters and poses the body.
pub struct AnimatorSyncPlugin;

impl Plugin for AnimatorSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_animator, drive_pose).chain().in_set(FrameSet::Animation),
        );
    }
}

fn sync_animator(
    tuning: Res<Tuning>,
    mut accepted: MessageReader<JumpAccepted>,
    mut query: Query<(Entity, &Locomotion, &KinematicBody, &mut AnimationSync, &mut AnimatorParameters)>,
) {
    let settings = LocomotionSettings::from(&*tuning);
    let jumped: Vec<Entity> = accepted.read().map(|msg| msg.entity).collect();

    for (entity, loco, body, mut sync, mut params) in &mut query {
        let inputs = AnimationInputs {
            speed: loco.animation_speed(&settings),
            resting: loco.is_resting(),
            grounded: body.is_grounded(),
            vertical_speed: loco.vertical_speed(),
            jump_accepted: jumped.contains(&entity),
        };
        sync.apply(&inputs, &mut params);
    }
}

fn drive_pose(
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut bodies: Query<(&ChildOf, &mut Transform), With<DogBody>>,
    mut dogs: Query<(&mut DogPose, &mut AnimatorParameters)>,
) {
    let dt = time.delta_secs();
    for (child_of, mut transform) in &mut bodies {
        let Ok((mut pose, mut params)) = dogs.get_mut(child_of.parent()) else {
            continue;
        };
        let offset = pose.update(&mut params, dt, tuning.jump_delay);
        transform.translation.y = BODY_HEIGHT + offset.lift;
        transform.scale.y = offset.stretch;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::game::animator::{param, PoseState};

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(Tuning::default())
            .insert_resource(Time::<()>::default())
            .add_message::<JumpAccepted>()
            .add_plugins(AnimatorSyncPlugin);
        app
    }

    fn dog(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Locomotion::new(0.0, Quat::IDENTITY),
                KinematicBody::default(),
                AnimationSync::default(),
                AnimatorParameters::default(),
                DogPose::default(),
            ))
            .id()
    }

    #[test]
    fn accepted_jump_reaches_only_its_dog() {
        let mut app = app();
        let a = dog(&mut app);
        let b = dog(&mut app);
        app.world_mut().write_message(JumpAccepted { entity: a });
        app.update();

        let params = |e| app.world().get::<AnimatorParameters>(e).unwrap();
        assert!(params(a).is_triggered(param::JUMP));
        assert!(!params(b).is_triggered(param::JUMP));
        assert!(params(b).bool(param::GROUNDED));
    }

    #[test]
    fn body_child_consumes_trigger_and_crouches() {
        let mut app = app();
        let dog = dog(&mut app);
        let body = app
            .world_mut()
            .spawn((DogBody, Transform::from_xyz(0.0, BODY_HEIGHT, 0.0), ChildOf(dog)))
            .id();
        app.world_mut().write_message(JumpAccepted { entity: dog });
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(16));
        app.update();

        assert!(!app.world().get::<AnimatorParameters>(dog).unwrap().is_triggered(param::JUMP));
        assert_eq!(app.world().get::<DogPose>(dog).unwrap().state, PoseState::WindUp);
        let tf = app.world().get::<Transform>(body).unwrap();
        assert!(tf.translation.y < BODY_HEIGHT);
        assert!(tf.scale.y < 1.0);
    }
}
