use bevy::prelude::*;

/// A jump request passed the grounded/resting check. Published once; both the
/// delayed impulse and the animator's `jump` trigger follow from it.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpAccepted {
    pub entity: Entity,
}
