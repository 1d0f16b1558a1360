use serde::{Deserialize, Serialize};

// ── Newtypes ────────────────────────────────────────────────────────

/// Duration in seconds. Always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f32);

impl Seconds {
    pub fn new(v: f32) -> Self {
        debug_assert!(v.is_finite(), "Seconds must be finite");
        Self(v.max(0.0))
    }

    /// Decrement by dt, clamped to 0.
    pub fn dec(self, dt: f32) -> Self {
        Self((self.0 - dt).max(0.0))
    }

    pub fn is_expired(self) -> bool {
        self.0 <= 0.0
    }
}

/// Walk/sprint blend. Always clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Blend(pub f32);

impl Blend {
    pub fn new(v: f32) -> Self {
        debug_assert!(!v.is_nan(), "Blend must not be NaN");
        Self(v.clamp(0.0, 1.0))
    }

    /// Move toward `target` by factor `t` (clamped).
    pub fn approach(self, target: f32, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(self.0 + (target - self.0) * t)
    }
}
