use std::f32::consts::TAU;

use bevy::math::EulerRot;
use bevy::prelude::*;

use super::smoothing::{blend_factor, smooth_damp_angle, smooth_damp_vec2};
use super::types::{Blend, Seconds};
use crate::config::tuning::Tuning;

/// Movement parameters for one tick, usually taken from [`Tuning`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionSettings {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub acceleration: f32,
    pub turn_deadzone: f32,
    pub jump_speed: f32,
    pub jump_delay: f32,
    pub air_control: f32,
    pub gravity_scale: f32,
    pub gravity: f32,
    pub grounded_floor: f32,
}

impl From<&Tuning> for LocomotionSettings {
    fn from(t: &Tuning) -> Self {
        Self {
            walk_speed: t.walk_speed,
            sprint_speed: t.sprint_speed,
            acceleration: t.acceleration,
            turn_deadzone: t.turn_deadzone,
            jump_speed: t.jump_speed,
            jump_delay: t.jump_delay,
            air_control: t.air_control,
            gravity_scale: t.gravity_scale,
            gravity: t.gravity,
            grounded_floor: t.grounded_floor,
        }
    }
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

impl LocomotionSettings {
    /// Smoothing time constant for a tick of length `dt`.
    fn smooth_time(&self, dt: f32) -> f32 {
        dt / self.acceleration.max(1e-3)
    }
}

/// Read-only view of the world for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub dt: f32,
    /// Ground contact reported by the motor after the previous move.
    pub grounded: bool,
    pub camera_rotation: Quat,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// World-space displacement to hand to the character motor.
    pub displacement: Vec3,
    pub facing: Quat,
    /// The pending jump impulse was applied this tick.
    pub jumped: bool,
}

/// Why a jump request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpRejected {
    Airborne,
    Resting,
    AlreadyPending,
}

/// Per-character locomotion state: camera-relative smoothed movement,
/// walk/sprint blend, resting, delayed jumps and simplified gravity.
///
/// Everything needed from the world arrives in a [`TickContext`]; a tick
/// returns a displacement for the character motor.
#[derive(Component, Debug, Clone)]
pub struct Locomotion {
    planned_input: Vec2,
    smoothed_movement: Vec2,
    movement_velocity: Vec2,
    vertical_velocity: f32,
    sprint_amount: Blend,
    is_sprinting: bool,
    is_resting: bool,
    smoothed_camera: Quat,
    facing_yaw: f32,
    turn_velocity: f32,
    pending_jump: Option<Seconds>,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(0.0, Quat::IDENTITY)
    }
}

impl Locomotion {
    /// Start facing `facing_yaw` with the camera smoothing settled on `camera_rotation`.
    pub fn new(facing_yaw: f32, camera_rotation: Quat) -> Self {
        Self {
            planned_input: Vec2::ZERO,
            smoothed_movement: Vec2::ZERO,
            movement_velocity: Vec2::ZERO,
            vertical_velocity: 0.0,
            sprint_amount: Blend::default(),
            is_sprinting: false,
            is_resting: false,
            smoothed_camera: camera_rotation,
            facing_yaw: wrap_yaw(facing_yaw),
            turn_velocity: 0.0,
            pending_jump: None,
        }
    }

    // ── Input events ────────────────────────────────────────────────

    pub fn set_planned_input(&mut self, input: Vec2) {
        self.planned_input = input;
    }

    pub fn clear_planned_input(&mut self) {
        self.planned_input = Vec2::ZERO;
    }

    pub fn set_sprinting(&mut self, sprinting: bool) {
        self.is_sprinting = sprinting;
    }

    pub fn set_resting(&mut self, resting: bool) {
        self.is_resting = resting;
    }

    /// Schedule a jump impulse `jump_delay` seconds from now.
    ///
    /// Only one jump can be pending; the impulse is re-validated when it fires.
    pub fn request_jump(&mut self, settings: &LocomotionSettings, grounded: bool) -> Result<(), JumpRejected> {
        if self.pending_jump.is_some() {
            return Err(JumpRejected::AlreadyPending);
        }
        if !grounded {
            return Err(JumpRejected::Airborne);
        }
        if self.is_resting {
            return Err(JumpRejected::Resting);
        }
        self.pending_jump = Some(Seconds::new(settings.jump_delay));
        Ok(())
    }

    /// Drop everything driven by input: latches, planned input and any pending jump.
    pub fn deactivate(&mut self) {
        self.pending_jump = None;
        self.planned_input = Vec2::ZERO;
        self.is_sprinting = false;
        self.is_resting = false;
    }

    // ── Reads ───────────────────────────────────────────────────────

    #[cfg(test)]
    pub fn planned_input(&self) -> Vec2 {
        self.planned_input
    }

    #[cfg(test)]
    pub fn smoothed_movement(&self) -> Vec2 {
        self.smoothed_movement
    }

    pub fn vertical_speed(&self) -> f32 {
        self.vertical_velocity
    }

    #[cfg(test)]
    pub fn sprint_amount(&self) -> f32 {
        self.sprint_amount.0
    }

    #[cfg(test)]
    pub fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }

    pub fn is_resting(&self) -> bool {
        self.is_resting
    }

    #[cfg(test)]
    pub fn jump_pending(&self) -> bool {
        self.pending_jump.is_some()
    }

    #[cfg(test)]
    pub fn facing_yaw(&self) -> f32 {
        self.facing_yaw
    }

    pub fn facing(&self) -> Quat {
        Quat::from_rotation_y(self.facing_yaw)
    }

    /// Movement magnitude as seen by animation: walking input reads as
    /// `walk / sprint` of full speed, sprinting as full speed.
    pub fn animation_speed(&self, settings: &LocomotionSettings) -> f32 {
        let ratio = if settings.sprint_speed > 0.0 {
            settings.walk_speed / settings.sprint_speed
        } else {
            1.0
        };
        let m = self.smoothed_movement;
        (m * ratio).lerp(m, self.sprint_amount.0).length()
    }

    // ── Tick ────────────────────────────────────────────────────────

    pub fn tick(&mut self, settings: &LocomotionSettings, ctx: &TickContext) -> TickOutput {
        let dt = ctx.dt.max(0.0);
        let smooth_time = settings.smooth_time(dt);

        let jumped = self.fire_pending_jump(settings, ctx.grounded, dt);

        let target = if ctx.grounded && !self.is_resting {
            self.planned_input
        } else if self.is_resting {
            Vec2::ZERO
        } else {
            self.smoothed_movement + (self.planned_input - self.smoothed_movement) * settings.air_control
        };
        self.smoothed_movement =
            smooth_damp_vec2(self.smoothed_movement, target, &mut self.movement_velocity, smooth_time, dt);

        let sprint_target = if self.is_sprinting { 1.0 } else { 0.0 };
        self.sprint_amount = self.sprint_amount.approach(sprint_target, settings.acceleration);
        self.smoothed_camera = self
            .smoothed_camera
            .slerp(ctx.camera_rotation, blend_factor(smooth_time))
            .normalize();

        // Bevy looks down -Z, so stick "up" maps to -Z.
        let m = self.smoothed_movement;
        let mut direction = Vec3::new(m.x, 0.0, -m.y);
        let magnitude = direction.length();
        if magnitude >= settings.turn_deadzone {
            let target_yaw = (-m.x).atan2(m.y) + yaw_of(self.smoothed_camera);
            self.facing_yaw = wrap_yaw(smooth_damp_angle(
                self.facing_yaw,
                target_yaw,
                &mut self.turn_velocity,
                smooth_time,
                dt,
            ));
            direction = self.facing() * Vec3::NEG_Z * magnitude;
        }

        let speed = settings.walk_speed + (settings.sprint_speed - settings.walk_speed) * self.sprint_amount.0;
        direction *= speed * dt;

        self.apply_gravity(settings, ctx.grounded, dt);
        direction.y = self.vertical_velocity * dt;

        TickOutput {
            displacement: direction,
            facing: self.facing(),
            jumped,
        }
    }

    fn fire_pending_jump(&mut self, settings: &LocomotionSettings, grounded: bool, dt: f32) -> bool {
        let Some(remaining) = self.pending_jump else {
            return false;
        };
        let remaining = remaining.dec(dt);
        if !remaining.is_expired() {
            self.pending_jump = Some(remaining);
            return false;
        }
        self.pending_jump = None;
        if grounded && !self.is_resting {
            self.vertical_velocity = settings.jump_speed;
            true
        } else {
            false
        }
    }

    fn apply_gravity(&mut self, settings: &LocomotionSettings, grounded: bool, dt: f32) {
        if grounded {
            self.vertical_velocity = self.vertical_velocity.max(settings.grounded_floor);
        } else {
            self.vertical_velocity += settings.gravity_scale * settings.gravity * dt;
        }
    }
}

/// Yaw in `[0, TAU)`.
fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = yaw.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to TAU.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Heading of a rotation around the world Y axis.
pub fn yaw_of(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::motor::{CharacterMotor, KinematicBody};
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn grounded() -> TickContext {
        TickContext {
            dt: DT,
            grounded: true,
            camera_rotation: Quat::IDENTITY,
        }
    }

    fn airborne() -> TickContext {
        TickContext {
            grounded: false,
            ..grounded()
        }
    }

    #[test]
    fn sprint_amount_stays_in_unit_range() {
        let mut seed: u32 = 12345;
        let mut next = move || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as f32 / 65_535.0
        };
        let mut loco = Locomotion::default();
        for _ in 0..2_000 {
            let settings = LocomotionSettings {
                acceleration: next() * 3.0,
                ..Default::default()
            };
            loco.set_sprinting(next() > 0.5);
            loco.set_resting(next() > 0.8);
            loco.set_planned_input(Vec2::new(next() * 2.0 - 1.0, next() * 2.0 - 1.0));
            let ctx = TickContext {
                dt: next() * 0.1,
                grounded: next() > 0.3,
                camera_rotation: Quat::from_rotation_y(next() * 6.0),
            };
            loco.tick(&settings, &ctx);
            let s = loco.sprint_amount();
            assert!((0.0..=1.0).contains(&s), "sprint amount {s}");
        }
    }

    #[test]
    fn resting_drains_movement_monotonically() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.set_planned_input(Vec2::new(0.6, 0.8));
        for _ in 0..60 {
            loco.tick(&settings, &grounded());
        }
        assert!(loco.smoothed_movement().length() > 0.99);

        loco.clear_planned_input();
        loco.set_resting(true);
        let mut previous = loco.smoothed_movement().length();
        for _ in 0..60 {
            loco.tick(&settings, &grounded());
            let now = loco.smoothed_movement().length();
            assert!(now <= previous, "{now} > {previous}");
            previous = now;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn resting_ignores_held_input() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.set_resting(true);
        loco.set_planned_input(Vec2::Y);
        for _ in 0..30 {
            loco.tick(&settings, &grounded());
        }
        assert_eq!(loco.smoothed_movement(), Vec2::ZERO);
    }

    #[test]
    fn rest_release_returns_to_ground_approach() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.set_planned_input(Vec2::Y);
        loco.set_resting(true);
        loco.tick(&settings, &grounded());
        loco.set_resting(false);
        loco.tick(&settings, &grounded());
        assert!(loco.smoothed_movement().y > 0.5, "{:?}", loco.smoothed_movement());
    }

    #[test]
    fn air_control_limits_steering() {
        let settings = LocomotionSettings::default();
        let mut ground = Locomotion::default();
        let mut air = Locomotion::default();
        ground.set_planned_input(Vec2::X);
        air.set_planned_input(Vec2::X);
        ground.tick(&settings, &grounded());
        air.tick(&settings, &airborne());
        assert!(air.smoothed_movement().x > 0.0);
        assert!(air.smoothed_movement().x < ground.smoothed_movement().x * 0.5);
    }

    #[test]
    fn gravity_floor_while_grounded() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        for _ in 0..30 {
            loco.tick(&settings, &airborne());
        }
        assert!(loco.vertical_speed() < settings.grounded_floor);
        for _ in 0..10 {
            loco.tick(&settings, &grounded());
            assert!(loco.vertical_speed() >= settings.grounded_floor);
        }
        assert_eq!(loco.vertical_speed(), settings.grounded_floor);
    }

    #[test]
    fn gravity_accumulates_while_airborne() {
        let settings = LocomotionSettings::default();
        let expected = settings.gravity_scale * settings.gravity * DT;
        let mut loco = Locomotion::default();
        let mut previous = loco.vertical_speed();
        for _ in 0..20 {
            let out = loco.tick(&settings, &airborne());
            let now = loco.vertical_speed();
            assert!(now < previous);
            assert!((now - previous - expected).abs() < 1e-4);
            assert!((out.displacement.y - now * DT).abs() < 1e-6);
            previous = now;
        }
    }

    #[test]
    fn jump_fires_once_after_delay() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        assert_eq!(loco.request_jump(&settings, true), Ok(()));

        let mut fired_at = Vec::new();
        for i in 0..30 {
            if loco.tick(&settings, &grounded()).jumped {
                fired_at.push(i);
                assert_eq!(loco.vertical_speed(), settings.jump_speed);
            }
        }
        assert_eq!(fired_at.len(), 1);
        let elapsed = (fired_at[0] + 1) as f32 * DT;
        assert!(elapsed >= settings.jump_delay - 1e-4 && elapsed < settings.jump_delay + 2.0 * DT);
    }

    #[test]
    fn second_press_inside_window_is_rejected() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.request_jump(&settings, true).unwrap();
        loco.tick(&settings, &grounded());
        assert_eq!(loco.request_jump(&settings, true), Err(JumpRejected::AlreadyPending));

        let fired = (0..30).filter(|_| loco.tick(&settings, &grounded()).jumped).count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn jump_requires_ground_and_no_rest() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        assert_eq!(loco.request_jump(&settings, false), Err(JumpRejected::Airborne));
        loco.set_resting(true);
        assert_eq!(loco.request_jump(&settings, true), Err(JumpRejected::Resting));
        assert!(!loco.jump_pending());
    }

    #[test]
    fn pending_jump_revalidated_when_it_fires() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.request_jump(&settings, true).unwrap();
        loco.set_resting(true);
        let fired = (0..30).filter(|_| loco.tick(&settings, &grounded()).jumped).count();
        assert_eq!(fired, 0);
        assert!(!loco.jump_pending());
        assert!(loco.vertical_speed() <= 0.0);

        loco.set_resting(false);
        loco.request_jump(&settings, true).unwrap();
        let fired = (0..30).filter(|_| loco.tick(&settings, &airborne()).jumped).count();
        assert_eq!(fired, 0);
    }

    #[test]
    fn deactivate_cancels_pending_jump_and_latches() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.set_sprinting(true);
        loco.set_planned_input(Vec2::Y);
        loco.request_jump(&settings, true).unwrap();
        loco.deactivate();

        assert!(!loco.jump_pending());
        assert!(!loco.is_sprinting());
        assert_eq!(loco.planned_input(), Vec2::ZERO);
        let fired = (0..30).filter(|_| loco.tick(&settings, &grounded()).jumped).count();
        assert_eq!(fired, 0);
    }

    #[test]
    fn forward_input_walks_camera_forward() {
        let settings = LocomotionSettings::default();
        let camera = Quat::from_rotation_y(FRAC_PI_2);
        let mut loco = Locomotion::new(0.0, camera);
        let mut body = KinematicBody::default();
        let mut position = Vec3::ZERO;
        loco.set_planned_input(Vec2::Y);

        let mut last = TickOutput {
            displacement: Vec3::ZERO,
            facing: Quat::IDENTITY,
            jumped: false,
        };
        for _ in 0..120 {
            let ctx = TickContext {
                dt: DT,
                grounded: body.is_grounded(),
                camera_rotation: camera,
            };
            last = loco.tick(&settings, &ctx);
            body.move_by(&mut position, last.displacement);
        }

        // Camera yawed a quarter turn left: its forward is -X.
        assert!((loco.facing_yaw() - FRAC_PI_2).abs() < 1e-2, "yaw {}", loco.facing_yaw());
        let horizontal = Vec3::new(last.displacement.x, 0.0, last.displacement.z);
        assert!((horizontal.length() / DT - settings.walk_speed).abs() < 1e-2);
        assert!(horizontal.normalize().dot(Vec3::NEG_X) > 0.999);
        assert!((position.x + 2.0 * settings.walk_speed).abs() < 0.3, "x {}", position.x);
        assert!(position.z.abs() < 0.1);
        assert!(body.is_grounded());
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn small_input_keeps_facing() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::new(1.0, Quat::IDENTITY);
        loco.set_planned_input(Vec2::new(0.05, 0.0));
        for _ in 0..60 {
            loco.tick(&settings, &grounded());
        }
        assert_eq!(loco.facing_yaw(), 1.0);
    }

    #[test]
    fn sprint_blends_speed_and_animation() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::default();
        loco.set_planned_input(Vec2::Y);
        loco.set_sprinting(true);
        let mut out = loco.tick(&settings, &grounded());
        for _ in 0..60 {
            out = loco.tick(&settings, &grounded());
        }
        let horizontal = Vec3::new(out.displacement.x, 0.0, out.displacement.z).length() / DT;
        assert!((horizontal - settings.sprint_speed).abs() < 1e-2);
        assert!((loco.animation_speed(&settings) - 1.0).abs() < 1e-3);

        loco.set_sprinting(false);
        for _ in 0..60 {
            loco.tick(&settings, &grounded());
        }
        let walking = settings.walk_speed / settings.sprint_speed;
        assert!((loco.animation_speed(&settings) - walking).abs() < 1e-3);
    }

    #[test]
    fn yaw_of_reads_heading() {
        assert!((yaw_of(Quat::from_rotation_y(0.7)) - 0.7).abs() < 1e-5);
        let tilted = Quat::from_rotation_y(-1.2) * Quat::from_rotation_x(-0.4);
        assert!((yaw_of(tilted) + 1.2).abs() < 1e-4);
    }

    #[test]
    fn facing_stays_wrapped_while_camera_orbits() {
        let settings = LocomotionSettings::default();
        let mut loco = Locomotion::new(-0.5, Quat::IDENTITY);
        assert!((loco.facing_yaw() - (TAU - 0.5)).abs() < 1e-5);
        loco.set_planned_input(Vec2::Y);

        // Ten full turns of the camera.
        for i in 0..1_200 {
            let ctx = TickContext {
                camera_rotation: Quat::from_rotation_y(i as f32 * DT * std::f32::consts::PI),
                ..grounded()
            };
            loco.tick(&settings, &ctx);
            let yaw = loco.facing_yaw();
            assert!((0.0..TAU).contains(&yaw), "yaw {yaw} at tick {i}");
        }
    }
}
