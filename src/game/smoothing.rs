use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Smallest accepted smoothing time constant (seconds).
pub const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Critically damped approach of `current` toward `target`.
///
/// Uses the cubic approximation of `exp(-omega * dt)`; the result is clamped to
/// `target` if it would step past it.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let omega = 2.0 / smooth_time.max(MIN_SMOOTH_TIME);
    let decay = decay_factor(omega * dt);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        *velocity = 0.0;
        return target;
    }
    output
}

/// Two-dimensional [`smooth_damp`]; overshoot is detected along the approach axis.
pub fn smooth_damp_vec2(current: Vec2, target: Vec2, velocity: &mut Vec2, smooth_time: f32, dt: f32) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }
    let omega = 2.0 / smooth_time.max(MIN_SMOOTH_TIME);
    let decay = decay_factor(omega * dt);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec2::ZERO;
        return target;
    }
    output
}

/// Shortest signed rotation from `from` to `to`, in `(-PI, PI]`.
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// [`smooth_damp`] over angles (radians), turning the short way round.
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Clamp a per-tick interpolation factor into `[0, 1]`.
pub fn blend_factor(rate: f32) -> f32 {
    if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
}

fn decay_factor(x: f32) -> f32 {
    1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn converges_without_passing_target() {
        let mut v = 0.0;
        let mut x = 0.0;
        for _ in 0..120 {
            x = smooth_damp(x, 1.0, &mut v, 0.2, DT);
            assert!(x <= 1.0);
        }
        assert!((x - 1.0).abs() < 1e-3, "x = {x}");
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut v = 3.0;
        assert_eq!(smooth_damp(0.5, 1.0, &mut v, 0.1, 0.0), 0.5);
        assert_eq!(v, 3.0);
        let mut v2 = Vec2::ONE;
        assert_eq!(smooth_damp_vec2(Vec2::X, Vec2::Y, &mut v2, 0.1, 0.0), Vec2::X);
    }

    #[test]
    fn at_target_stays_put() {
        let mut v = 0.0;
        assert_eq!(smooth_damp(2.0, 2.0, &mut v, 0.1, DT), 2.0);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn vec2_clamps_overshoot() {
        // Incoming speed this high would carry the value past the target.
        let mut v = Vec2::new(1000.0, 0.0);
        let out = smooth_damp_vec2(Vec2::ZERO, Vec2::X, &mut v, 0.01, 0.5);
        assert_eq!(out, Vec2::X);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn delta_angle_takes_short_way() {
        assert!((delta_angle(0.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((delta_angle(0.1, TAU - 0.1) + 0.2).abs() < 1e-5);
        assert!((delta_angle(-3.0, 3.0) - (6.0 - TAU)).abs() < 1e-5);
        assert!((delta_angle(0.0, PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn angle_damping_wraps_around() {
        let mut v = 0.0;
        let mut a = 0.1;
        for _ in 0..240 {
            a = smooth_damp_angle(a, TAU - 0.1, &mut v, 0.1, DT);
        }
        // Turned backwards through zero rather than forwards through PI.
        assert!((a + 0.1).abs() < 1e-3, "a = {a}");
    }

    #[test]
    fn blend_factor_clamps() {
        assert_eq!(blend_factor(2.0), 1.0);
        assert_eq!(blend_factor(-1.0), 0.0);
        assert_eq!(blend_factor(f32::NAN), 0.0);
        assert_eq!(blend_factor(0.25), 0.25);
    }
}
