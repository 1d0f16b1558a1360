use bevy::prelude::*;

use super::actions::Action;

/// Control scheme a binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlScheme {
    KeyboardMouse,
    Gamepad,
}

impl ControlScheme {
    pub const ALL: [ControlScheme; 2] = [ControlScheme::KeyboardMouse, ControlScheme::Gamepad];

    pub fn name(self) -> &'static str {
        match self {
            ControlScheme::KeyboardMouse => "Keyboard|Mouse",
            ControlScheme::Gamepad => "Gamepad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickDirection {
    Up,
    Down,
    Left,
    Right,
}

/// A single physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Key(KeyCode),
    Button(GamepadButton),
    /// One half-axis of a stick, read as 0..1.
    StickPart(Stick, StickDirection),
    Stick(Stick),
    MouseDelta,
}

impl Control {
    pub fn label(self) -> String {
        match self {
            Control::Key(key) => key_label(key),
            Control::Button(button) => format!("{button:?}"),
            Control::StickPart(stick, dir) => format!("{stick:?} stick {dir:?}"),
            Control::Stick(stick) => format!("{stick:?} stick"),
            Control::MouseDelta => "Mouse".into(),
        }
    }
}

fn key_label(key: KeyCode) -> String {
    let raw = format!("{key:?}");
    raw.strip_prefix("Key")
        .or_else(|| raw.strip_prefix("Arrow"))
        .map(str::to_string)
        .unwrap_or(raw)
}

/// Four controls combined into one 2-D value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composite2d {
    pub name: &'static str,
    pub up: Control,
    pub down: Control,
    pub left: Control,
    pub right: Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    Control(Control),
    Composite(Composite2d),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub action: Action,
    pub scheme: ControlScheme,
    pub source: BindingSource,
}

const fn bind(action: Action, scheme: ControlScheme, control: Control) -> Binding {
    Binding {
        action,
        scheme,
        source: BindingSource::Control(control),
    }
}

const fn composite(
    scheme: ControlScheme,
    name: &'static str,
    up: Control,
    down: Control,
    left: Control,
    right: Control,
) -> Binding {
    Binding {
        action: Action::Movement,
        scheme,
        source: BindingSource::Composite(Composite2d {
            name,
            up,
            down,
            left,
            right,
        }),
    }
}

use Control::{Button, Key, MouseDelta, StickPart};
use ControlScheme::{Gamepad as Pad, KeyboardMouse as Kbm};

/// Every binding in the game.
pub const BINDINGS: &[Binding] = &[
    // ── Player ──
    bind(Action::Jump, Kbm, Key(KeyCode::Space)),
    bind(Action::Jump, Pad, Button(GamepadButton::North)),
    bind(Action::Jump, Pad, Button(GamepadButton::West)),
    composite(
        Kbm,
        "arrows",
        Key(KeyCode::ArrowUp),
        Key(KeyCode::ArrowDown),
        Key(KeyCode::ArrowLeft),
        Key(KeyCode::ArrowRight),
    ),
    composite(
        Kbm,
        "wasd",
        Key(KeyCode::KeyW),
        Key(KeyCode::KeyS),
        Key(KeyCode::KeyA),
        Key(KeyCode::KeyD),
    ),
    composite(
        Pad,
        "gamepad",
        StickPart(Stick::Right, StickDirection::Up),
        StickPart(Stick::Right, StickDirection::Down),
        StickPart(Stick::Right, StickDirection::Left),
        StickPart(Stick::Right, StickDirection::Right),
    ),
    bind(Action::Rest, Kbm, Key(KeyCode::KeyQ)),
    bind(Action::Rest, Pad, Button(GamepadButton::DPadDown)),
    bind(Action::Sprint, Kbm, Key(KeyCode::ShiftLeft)),
    bind(Action::Sprint, Pad, Button(GamepadButton::East)),
    bind(Action::CameraControl, Pad, Control::Stick(Stick::Left)),
    bind(Action::CameraControl, Kbm, MouseDelta),
    // ── System ──
    bind(Action::Help, Kbm, Key(KeyCode::KeyH)),
    bind(Action::Help, Kbm, Key(KeyCode::KeyC)),
    bind(Action::Help, Pad, Button(GamepadButton::DPadUp)),
];

/// Bindings of `action`, in table order.
pub fn bindings_of(action: Action) -> impl Iterator<Item = &'static Binding> {
    BINDINGS.iter().filter(move |b| b.action == action)
}

/// Bindings usable with `scheme`, in table order.
pub fn bindings_for(scheme: ControlScheme) -> impl Iterator<Item = &'static Binding> {
    BINDINGS.iter().filter(move |b| b.scheme == scheme)
}

/// Short human-readable description, e.g. `W/S/A/D` or `Space`.
pub fn describe(binding: &Binding) -> String {
    match binding.source {
        BindingSource::Control(control) => control.label(),
        BindingSource::Composite(c) => {
            if let (StickPart(stick, _), StickPart(..)) = (c.up, c.down) {
                format!("{stick:?} stick")
            } else {
                [c.up, c.down, c.left, c.right]
                    .map(Control::label)
                    .join("/")
            }
        }
    }
}
