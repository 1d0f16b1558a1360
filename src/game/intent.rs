use bevy::prelude::*;

use super::animator::{param, AnimatorParameters, DogPose};
use super::components::Controllable;
use super::events::JumpAccepted;
use super::locomotion::{Locomotion, LocomotionSettings};
use super::motor::{CharacterMotor, KinematicBody};
use crate::config::tuning::Tuning;
use crate::input::actions::{Action, ActionMap, ActionMessage, ActionPhase};

/// Route logical actions to every controllable character.
pub fn apply_player_actions(
    tuning: Res<Tuning>,
    mut actions: MessageReader<ActionMessage>,
    mut query: Query<(Entity, &mut Locomotion, &KinematicBody), With<Controllable>>,
    mut accepted: MessageWriter<JumpAccepted>,
) {
    let settings = LocomotionSettings::from(&*tuning);
    for msg in actions.read().filter(|m| m.action.map() == ActionMap::Player) {
        let performed = msg.is_performed();
        for (entity, mut loco, body) in &mut query {
            match (msg.action, msg.phase) {
                (Action::Movement, ActionPhase::Performed(value)) => loco.set_planned_input(value.axis2d()),
                (Action::Movement, ActionPhase::Canceled) => loco.clear_planned_input(),
                (Action::Sprint, _) => loco.set_sprinting(performed),
                (Action::Rest, _) => loco.set_resting(performed),
                (Action::Jump, ActionPhase::Performed(_)) => {
                    match loco.request_jump(&settings, body.is_grounded()) {
                        Ok(()) => {
                            debug!("Jump accepted for {entity}");
                            accepted.write(JumpAccepted { entity });
                        }
                        Err(reason) => debug!("Jump rejected for {entity}: {reason:?}"),
                    }
                }
                _ => {}
            }
        }
    }
}

/// Characters that lost [`Controllable`] drop their input state and pending
/// jump, along with the crouch announcing it.
pub fn release_controls(
    mut removed: RemovedComponents<Controllable>,
    mut query: Query<(&mut Locomotion, Option<&mut AnimatorParameters>, Option<&mut DogPose>)>,
) {
    for entity in removed.read() {
        let Ok((mut loco, params, pose)) = query.get_mut(entity) else {
            continue;
        };
        loco.deactivate();
        if let Some(mut params) = params {
            params.take_trigger(param::JUMP);
        }
        if let Some(mut pose) = pose {
            pose.cancel_wind_up();
        }
        debug!("Controls released for {entity}");
    }
}
