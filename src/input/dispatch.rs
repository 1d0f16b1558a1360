use std::collections::HashMap;

use bevy::prelude::*;

use super::actions::{Action, ActionKind, ActionMessage};
use super::bindings::{bindings_of, Binding, BindingSource, Control, ControlScheme, Stick, StickDirection};

/// Read access to physical device state for one frame.
pub trait ControlReader {
    /// Actuation in 0..1. Sticks and the mouse report their magnitude.
    fn actuation(&self, control: Control) -> f32;

    /// Two-dimensional value of a stick or the mouse; zero for buttons.
    fn axis(&self, control: Control) -> Vec2;
}

/// Strongest current value of an action and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: Vec2,
    pub scheme: ControlScheme,
}

/// Value of one binding. Buttons read into `x`.
pub fn read_binding(binding: &Binding, reader: &impl ControlReader) -> Vec2 {
    match binding.source {
        BindingSource::Control(control) => match binding.action.kind() {
            ActionKind::Button => Vec2::new(reader.actuation(control), 0.0),
            ActionKind::Axis2d => reader.axis(control),
        },
        BindingSource::Composite(c) => Vec2::new(
            reader.actuation(c.right) - reader.actuation(c.left),
            reader.actuation(c.up) - reader.actuation(c.down),
        )
        .clamp_length_max(1.0),
    }
}

/// Strongest non-zero binding of `action`, if any.
pub fn evaluate(action: Action, reader: &impl ControlReader) -> Option<Reading> {
    bindings_of(action)
        .map(|b| Reading {
            value: read_binding(b, reader),
            scheme: b.scheme,
        })
        .filter(|r| r.value != Vec2::ZERO)
        .max_by(|a, b| a.value.length_squared().total_cmp(&b.value.length_squared()))
}

/// Remembers each action's last value and reports changes as messages.
#[derive(Resource, Debug, Default)]
pub struct ActionTracker {
    last: HashMap<Action, Vec2>,
}

impl ActionTracker {
    pub fn update(&mut self, action: Action, reading: Option<Reading>) -> Option<ActionMessage> {
        let value = reading.map_or(Vec2::ZERO, |r| r.value);
        let last = self.last.insert(action, value).unwrap_or(Vec2::ZERO);

        match action.kind() {
            ActionKind::Button => {
                let was = last.x >= Action::PRESS_THRESHOLD;
                let now = value.x >= Action::PRESS_THRESHOLD;
                match (was, now, reading) {
                    (false, true, Some(r)) => Some(ActionMessage::performed(action, r.scheme)),
                    (true, false, _) => Some(ActionMessage::canceled(action)),
                    _ => None,
                }
            }
            ActionKind::Axis2d => match reading {
                _ if value == last => None,
                Some(r) => Some(ActionMessage::axis(action, r.value, r.scheme)),
                None => Some(ActionMessage::canceled(action)),
            },
        }
    }

    /// Forget all values so controls still held are reported again.
    pub fn reset(&mut self) {
        self.last.clear();
    }

    /// Evaluate every action against `reader`.
    pub fn poll(&mut self, reader: &impl ControlReader) -> Vec<ActionMessage> {
        Action::ALL
            .iter()
            .filter_map(|&action| self.update(action, evaluate(action, reader)))
            .collect()
    }
}

/// Device state gathered from Bevy's input resources.
pub struct DeviceSnapshot<'a> {
    pub keys: &'a ButtonInput<KeyCode>,
    pub gamepads: Vec<&'a Gamepad>,
    pub mouse_delta: Vec2,
}

impl DeviceSnapshot<'_> {
    fn stick(&self, stick: Stick) -> Vec2 {
        self.gamepads
            .iter()
            .map(|pad| match stick {
                Stick::Left => pad.left_stick(),
                Stick::Right => pad.right_stick(),
            })
            .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
            .unwrap_or(Vec2::ZERO)
    }
}

impl ControlReader for DeviceSnapshot<'_> {
    fn actuation(&self, control: Control) -> f32 {
        match control {
            Control::Key(key) => pressed_value(self.keys.pressed(key)),
            Control::Button(button) => pressed_value(self.gamepads.iter().any(|pad| pad.pressed(button))),
            Control::StickPart(stick, direction) => {
                let v = self.stick(stick);
                let part = match direction {
                    StickDirection::Up => v.y,
                    StickDirection::Down => -v.y,
                    StickDirection::Left => -v.x,
                    StickDirection::Right => v.x,
                };
                part.max(0.0)
            }
            Control::Stick(_) | Control::MouseDelta => self.axis(control).length(),
        }
    }

    fn axis(&self, control: Control) -> Vec2 {
        match control {
            Control::Stick(stick) => self.stick(stick),
            Control::MouseDelta => self.mouse_delta,
            _ => Vec2::ZERO,
        }
    }
}

fn pressed_value(pressed: bool) -> f32 {
    if pressed { 1.0 } else { 0.0 }
}
