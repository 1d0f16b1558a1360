use bevy::prelude::*;

use super::bindings::ControlScheme;

/// Named group of actions enabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionMap {
    Player,
    System,
}

/// Logical actions; consumers never see physical devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Movement,
    Rest,
    Sprint,
    CameraControl,
    Help,
}

/// How an action's controls are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// On/off, actuated at [`Action::PRESS_THRESHOLD`].
    Button,
    /// Continuous 2-D value.
    Axis2d,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Jump,
        Action::Movement,
        Action::Rest,
        Action::Sprint,
        Action::CameraControl,
        Action::Help,
    ];

    pub const PRESS_THRESHOLD: f32 = 0.5;

    pub fn map(self) -> ActionMap {
        match self {
            Action::Help => ActionMap::System,
            _ => ActionMap::Player,
        }
    }

    pub fn kind(self) -> ActionKind {
        match self {
            Action::Movement | Action::CameraControl => ActionKind::Axis2d,
            _ => ActionKind::Button,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Jump => "Jump",
            Action::Movement => "Movement",
            Action::Rest => "Rest",
            Action::Sprint => "Sprint",
            Action::CameraControl => "CameraControl",
            Action::Help => "Help",
        }
    }
}

/// Value carried by a performed action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionValue {
    Button,
    Axis2d(Vec2),
}

impl ActionValue {
    pub fn axis2d(self) -> Vec2 {
        match self {
            ActionValue::Axis2d(v) => v,
            ActionValue::Button => Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionPhase {
    Performed(ActionValue),
    Canceled,
}

/// One logical input event.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ActionMessage {
    pub action: Action,
    pub phase: ActionPhase,
    /// Scheme of the control that performed the action.
    pub scheme: Option<ControlScheme>,
}

impl ActionMessage {
    pub fn performed(action: Action, scheme: ControlScheme) -> Self {
        Self {
            action,
            phase: ActionPhase::Performed(ActionValue::Button),
            scheme: Some(scheme),
        }
    }

    pub fn axis(action: Action, value: Vec2, scheme: ControlScheme) -> Self {
        Self {
            action,
            phase: ActionPhase::Performed(ActionValue::Axis2d(value)),
            scheme: Some(scheme),
        }
    }

    pub fn canceled(action: Action) -> Self {
        Self {
            action,
            phase: ActionPhase::Canceled,
            scheme: None,
        }
    }

    pub fn is_performed(&self) -> bool {
        matches!(self.phase, ActionPhase::Performed(_))
    }
}
