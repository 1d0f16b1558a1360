pub mod animation_plugin;
pub mod camera_plugin;
pub mod game_plugin;
pub mod input_plugin;
pub mod scene_plugin;
pub mod ui_plugin;
