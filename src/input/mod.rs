pub mod actions;
pub mod bindings;
pub mod dispatch;
