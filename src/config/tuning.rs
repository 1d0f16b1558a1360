use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// All tunable game parameters, loaded from tuning.ron.
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Movement ──
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Responsiveness of movement, turning, sprint blend and camera smoothing.
    pub acceleration: f32,
    /// Magnitude below which the character keeps its facing.
    pub turn_deadzone: f32,

    // ── Jump / gravity ──
    pub jump_speed: f32,
    /// Delay between an accepted jump and the vertical impulse (seconds).
    pub jump_delay: f32,
    /// Fraction of input that steers the character while airborne.
    pub air_control: f32,
    pub gravity_scale: f32,
    /// World gravity along Y (m/s², negative = down).
    pub gravity: f32,
    /// Vertical speed kept while grounded so the motor stays in contact.
    pub grounded_floor: f32,

    // ── Camera ──
    pub camera_distance: f32,
    pub camera_height: f32,
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Radians per second at full stick deflection.
    pub stick_sensitivity: f32,
    pub camera_min_pitch: f32,
    pub camera_max_pitch: f32,

    // ── HUD ──
    pub help_auto_hide_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            sprint_speed: 8.0,
            acceleration: 1.0,
            turn_deadzone: 0.1,
            jump_speed: 5.0,
            jump_delay: 0.2,
            air_control: 0.2,
            gravity_scale: 1.0,
            gravity: -9.81,
            grounded_floor: -1.0,
            camera_distance: 6.0,
            camera_height: 1.0,
            mouse_sensitivity: 0.004,
            stick_sensitivity: 2.5,
            camera_min_pitch: -1.2,
            camera_max_pitch: 0.3,
            help_auto_hide_secs: 5.0,
        }
    }
}

/// Failure while reading or writing tuning.ron.
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    /// Parsed, but a value is out of range.
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "IO error: {e}"),
            TuningError::Parse(e) => write!(f, "parse error: {e}"),
            TuningError::Serialize(e) => write!(f, "serialize error: {e}"),
            TuningError::Invalid(msg) => write!(f, "invalid value: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<ron::error::SpannedError> for TuningError {
    fn from(e: ron::error::SpannedError) -> Self {
        TuningError::Parse(e)
    }
}

impl From<ron::Error> for TuningError {
    fn from(e: ron::Error) -> Self {
        TuningError::Serialize(e)
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("dog_park")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path)?;
        let tuning: Self = ron::from_str(&contents)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the game cannot run with.
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("acceleration", self.acceleration),
            ("turn_deadzone", self.turn_deadzone),
            ("jump_speed", self.jump_speed),
            ("jump_delay", self.jump_delay),
            ("air_control", self.air_control),
            ("gravity_scale", self.gravity_scale),
            ("gravity", self.gravity),
            ("grounded_floor", self.grounded_floor),
            ("camera_distance", self.camera_distance),
            ("camera_height", self.camera_height),
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("stick_sensitivity", self.stick_sensitivity),
            ("camera_min_pitch", self.camera_min_pitch),
            ("camera_max_pitch", self.camera_max_pitch),
            ("help_auto_hide_secs", self.help_auto_hide_secs),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TuningError::Invalid(format!("{name} is {value}")));
        }
        if self.acceleration <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "acceleration must be positive, got {}",
                self.acceleration
            )));
        }
        if self.jump_delay < 0.0 {
            return Err(TuningError::Invalid(format!(
                "jump_delay must not be negative, got {}",
                self.jump_delay
            )));
        }
        if self.camera_min_pitch > self.camera_max_pitch {
            return Err(TuningError::Invalid(format!(
                "camera_min_pitch {} is above camera_max_pitch {}",
                self.camera_min_pitch, self.camera_max_pitch
            )));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TuningError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pretty = ron::ser::PrettyConfig::default();
        let s = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, s)?;
        Ok(())
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        Self::load_or_default_at(&Self::file_path())
    }

    pub fn load_or_default_at(path: &Path) -> Self {
        if path.exists() {
            match Self::load(path) {
                Ok(tuning) => {
                    info!("Loaded tuning from {:?}", path);
                    return tuning;
                }
                Err(e) => {
                    warn!("Failed to load tuning.ron: {e}, using defaults");
                    return Self::default();
                }
            }
        }
        let tuning = Self::default();
        if let Err(e) = tuning.save_to(path) {
            warn!("Failed to write tuning.ron: {e}");
        }
        tuning
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
