pub mod animator;
pub mod components;
pub mod events;
pub mod intent;
pub mod locomotion;
pub mod motor;
pub mod physics;
pub mod smoothing;
pub mod types;
