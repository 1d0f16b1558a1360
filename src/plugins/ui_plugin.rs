use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use super::game_plugin::FrameSet;
use crate::config::tuning::Tuning;
use crate::game::components::*;
use crate::game::types::Seconds;
use crate::input::actions::{Action, ActionMessage, ActionPhase};
use crate::input::bindings::{bindings_for, describe, ControlScheme};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud);
        app.add_systems(
            Update,
            (toggle_help, tick_help_auto_hide, update_fps_display)
                .chain()
                .in_set(FrameSet::Presentation),
        );
        app.add_systems(OnEnter(GamePhase::Paused), show_pause_banner);
        app.add_systems(OnExit(GamePhase::Paused), hide_pause_banner);
    }
}

/// Bindings grouped by control scheme, one line per binding.
pub fn help_text() -> String {
    let mut out = String::new();
    for scheme in ControlScheme::ALL {
        out.push_str(scheme.name());
        out.push('\n');
        for binding in bindings_for(scheme) {
            out.push_str(&format!("  {:<14}{}\n", binding.action.name(), describe(binding)));
        }
    }
    out.push_str("Esc pause / F5 reload tuning");
    out
}

fn setup_hud(mut commands: Commands, tuning: Res<Tuning>) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                FpsText,
                Text::new("FPS: --"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.2)),
            ));

            parent.spawn((
                HelpPanel,
                HelpAutoHide(Seconds::new(tuning.help_auto_hide_secs)),
                Text::new(help_text()),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Visibility::Visible,
            ));
        });

    commands.spawn((
        PauseBanner,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(45.0),
            top: Val::Percent(45.0),
            ..default()
        },
        Text::new("Paused"),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Visibility::Hidden,
    ));
}

/// Help is shown while held. Any Help event cancels the startup auto-hide.
fn toggle_help(
    mut commands: Commands,
    mut actions: MessageReader<ActionMessage>,
    mut panels: Query<(Entity, &mut Visibility), With<HelpPanel>>,
) {
    for msg in actions.read().filter(|m| m.action == Action::Help) {
        let visibility = match msg.phase {
            ActionPhase::Performed(_) => Visibility::Visible,
            ActionPhase::Canceled => Visibility::Hidden,
        };
        for (entity, mut vis) in &mut panels {
            *vis = visibility;
            commands.entity(entity).remove::<HelpAutoHide>();
        }
    }
}

fn tick_help_auto_hide(
    time: Res<Time>,
    mut commands: Commands,
    mut panels: Query<(Entity, &mut HelpAutoHide, &mut Visibility), With<HelpPanel>>,
) {
    for (entity, mut auto_hide, mut vis) in &mut panels {
        auto_hide.0 = auto_hide.0.dec(time.delta_secs());
        if auto_hide.0.is_expired() {
            *vis = Visibility::Hidden;
            commands.entity(entity).remove::<HelpAutoHide>();
        }
    }
}

fn update_fps_display(diagnostics: Option<Res<DiagnosticsStore>>, mut texts: Query<&mut Text, With<FpsText>>) {
    let Some(fps) = diagnostics
        .as_ref()
        .and_then(|d| d.get(&FrameTimeDiagnosticsPlugin::FPS))
        .and_then(|d| d.smoothed())
    else {
        return;
    };
    for mut text in &mut texts {
        **text = format!("FPS: {fps:.0}");
    }
}

fn show_pause_banner(mut banners: Query<&mut Visibility, With<PauseBanner>>) {
    for mut vis in &mut banners {
        *vis = Visibility::Visible;
    }
}

fn hide_pause_banner(mut banners: Query<&mut Visibility, With<PauseBanner>>) {
    for mut vis in &mut banners {
        *vis = Visibility::Hidden;
    }
}
