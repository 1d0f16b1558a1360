mod config;
mod game;
mod input;
mod plugins;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

use config::tuning::Tuning;
use plugins::{
    animation_plugin::AnimatorSyncPlugin, camera_plugin::FollowCameraPlugin, game_plugin::GamePlugin,
    input_plugin::ActionInputPlugin, scene_plugin::ScenePlugin, ui_plugin::HudPlugin,
};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dog Park".into(),
                resolution: (1280u32, 720u32).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .insert_resource(tuning)
        .add_plugins(GamePlugin)
        .add_plugins(ActionInputPlugin)
        .add_plugins(AnimatorSyncPlugin)
        .add_plugins(FollowCameraPlugin)
        .add_plugins(HudPlugin)
        .add_plugins(ScenePlugin)
        .run();
}
