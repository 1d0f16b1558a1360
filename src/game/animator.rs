use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use super::types::Seconds;

/// Animator parameter names.
pub mod param {
    pub const SPEED: &str = "speed";
    pub const JUMP: &str = "jump";
    pub const GROUNDED: &str = "grounded";
    pub const RESTING: &str = "resting";
    pub const VERTICAL_SPEED: &str = "verticalSpeed";
}

/// Named parameter store read by whatever animates the character.
#[derive(Component, Debug, Default)]
pub struct AnimatorParameters {
    floats: HashMap<&'static str, f32>,
    bools: HashMap<&'static str, bool>,
    triggers: HashSet<&'static str>,
    /// Total writes, for spotting redundant updates.
    #[cfg(test)]
    writes: u32,
}

impl AnimatorParameters {
    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
        self.record_write();
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
        self.record_write();
    }

    pub fn set_trigger(&mut self, name: &'static str) {
        self.triggers.insert(name);
        self.record_write();
    }

    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    #[cfg(test)]
    pub fn is_triggered(&self, name: &str) -> bool {
        self.triggers.contains(name)
    }

    fn record_write(&mut self) {
        #[cfg(test)]
        {
            self.writes += 1;
        }
    }

    /// Consume a trigger; true if it was set.
    pub fn take_trigger(&mut self, name: &str) -> bool {
        self.triggers.remove(name)
    }
}

/// Locomotion readings pushed to the animator each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationInputs {
    pub speed: f32,
    pub resting: bool,
    pub grounded: bool,
    pub vertical_speed: f32,
    pub jump_accepted: bool,
}

/// Last values written to the animator's edge-triggered booleans.
#[derive(Component, Debug, Default)]
pub struct AnimationSync {
    grounded: bool,
    resting: bool,
}

impl AnimationSync {
    pub fn apply(&mut self, inputs: &AnimationInputs, params: &mut AnimatorParameters) {
        params.set_float(param::SPEED, inputs.speed);

        if self.resting != inputs.resting {
            self.resting = inputs.resting;
            params.set_bool(param::RESTING, self.resting);
        }

        if self.grounded != inputs.grounded {
            self.grounded = inputs.grounded;
            params.set_bool(param::GROUNDED, self.grounded);
        }

        if !self.grounded {
            params.set_float(param::VERTICAL_SPEED, inputs.vertical_speed);
        }

        if inputs.jump_accepted {
            params.set_trigger(param::JUMP);
        }
    }
}

// ── Procedural pose ─────────────────────────────────────────────────

/// Coarse animation state derived from animator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseState {
    #[default]
    Idle,
    Walk,
    Run,
    Rest,
    WindUp,
    Jump,
    Fall,
}

/// Body offsets produced by the pose for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseOffset {
    pub lift: f32,
    /// Vertical scale of the body (1 = neutral).
    pub stretch: f32,
}

#[derive(Component, Debug, Default)]
pub struct DogPose {
    pub state: PoseState,
    wind_up: Seconds,
    gait_phase: f32,
}

impl DogPose {
    /// Drop an unfinished crouch, e.g. when the jump it announced was canceled.
    pub fn cancel_wind_up(&mut self) {
        self.wind_up = Seconds::default();
    }

    /// Advance the pose. A `jump` trigger starts a crouch lasting `wind_up_secs`,
    /// which should match the delay before the jump impulse.
    pub fn update(&mut self, params: &mut AnimatorParameters, dt: f32, wind_up_secs: f32) -> PoseOffset {
        if params.take_trigger(param::JUMP) {
            self.wind_up = Seconds::new(wind_up_secs);
        }
        self.wind_up = self.wind_up.dec(dt);

        let speed = params.float(param::SPEED);
        self.state = if !self.wind_up.is_expired() {
            PoseState::WindUp
        } else if !params.bool(param::GROUNDED) {
            if params.float(param::VERTICAL_SPEED) > 0.0 {
                PoseState::Jump
            } else {
                PoseState::Fall
            }
        } else if params.bool(param::RESTING) {
            PoseState::Rest
        } else if speed < 0.05 {
            PoseState::Idle
        } else if speed < 0.75 {
            PoseState::Walk
        } else {
            PoseState::Run
        };

        self.gait_phase = (self.gait_phase + dt * (4.0 + 8.0 * speed)) % std::f32::consts::TAU;

        match self.state {
            PoseState::Idle => PoseOffset { lift: 0.0, stretch: 1.0 },
            PoseState::Walk | PoseState::Run => PoseOffset {
                lift: self.gait_phase.sin().abs() * 0.08 * speed,
                stretch: 1.0,
            },
            PoseState::Rest => PoseOffset { lift: -0.25, stretch: 0.7 },
            PoseState::WindUp => PoseOffset { lift: -0.1, stretch: 0.8 },
            PoseState::Jump => PoseOffset { lift: 0.0, stretch: 1.15 },
            PoseState::Fall => PoseOffset { lift: 0.0, stretch: 1.05 },
        }
    }
}
