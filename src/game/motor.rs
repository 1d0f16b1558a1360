use bevy::prelude::*;

/// Resolves requested displacements against the world and reports ground contact.
pub trait CharacterMotor {
    /// Ground contact after the most recent move.
    fn is_grounded(&self) -> bool;

    /// Move `position` by `displacement`, returning the motion actually applied.
    fn move_by(&mut self, position: &mut Vec3, displacement: Vec3) -> Vec3;
}

/// Kinematic body on an infinite flat floor at `ground_height`.
#[derive(Component, Debug, Clone, Copy)]
pub struct KinematicBody {
    pub ground_height: f32,
    grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::on_ground(0.0)
    }
}

impl KinematicBody {
    pub fn on_ground(ground_height: f32) -> Self {
        Self {
            ground_height,
            grounded: true,
        }
    }
}

impl CharacterMotor for KinematicBody {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn move_by(&mut self, position: &mut Vec3, displacement: Vec3) -> Vec3 {
        let start = *position;
        let mut end = start + displacement;
        if end.y <= self.ground_height {
            end.y = self.ground_height;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
        *position = end;
        end - start
    }
}
