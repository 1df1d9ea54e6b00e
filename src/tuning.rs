//! Designer-facing tunables
//!
//! Plain numeric fields with defaults. Loaded from JSON; missing fields fall
//! back to the defaults and out-of-range values are clamped, never rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clamp01;
use crate::consts::DEFAULT_LEVEL_TAG;

/// Failure to load a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Locomotion ===
    /// Max horizontal speed (units/s)
    pub max_speed: f32,
    /// Initial vertical speed of a jump, before the global jump modifier
    pub jump_take_off_speed: f32,
    /// Air jumps granted per airborne period
    pub max_air_jumps: u32,

    // === Registry seeds ===
    /// Global multiplier on take-off speed
    pub jump_modifier: f32,
    /// Factor applied to upward velocity when jump is released early (0-1)
    pub jump_deceleration: f32,

    // === Health ===
    pub max_hp: u32,
    /// Seconds of invincibility after taking damage
    pub invincibility_duration: f32,
    /// Whether damage is ignored while invincibility is running
    pub invincibility_gates_damage: bool,

    // === Feedback ===
    pub jump_particles: u32,
    pub land_particles: u32,
    /// Volume of the landing sound (0.0 - 1.0)
    pub land_volume: f32,

    // === Death / respawn ===
    /// Seconds between death and respawn
    pub respawn_delay: f32,
    /// Seconds between respawn and control returning
    pub input_enable_delay: f32,

    /// Collider tag for walkable geometry
    pub level_tag: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: 7.0,
            jump_take_off_speed: 7.0,
            max_air_jumps: 1,

            jump_modifier: 1.5,
            jump_deceleration: 0.5,

            max_hp: 3,
            invincibility_duration: 0.25,
            invincibility_gates_damage: false,

            jump_particles: 15,
            land_particles: 25,
            land_volume: 0.4,

            respawn_delay: 2.0,
            input_enable_delay: 2.0,

            level_tag: DEFAULT_LEVEL_TAG.to_string(),
        }
    }
}

impl Tuning {
    /// Parse from JSON and clamp
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.clamped())
    }

    /// Read a JSON tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pull every field into its valid range
    pub fn clamped(mut self) -> Self {
        self.max_speed = non_negative(self.max_speed);
        self.jump_take_off_speed = non_negative(self.jump_take_off_speed);
        self.jump_modifier = non_negative(self.jump_modifier);
        self.jump_deceleration = clamp01(self.jump_deceleration);
        self.max_hp = self.max_hp.max(1);
        self.invincibility_duration = non_negative(self.invincibility_duration);
        self.land_volume = clamp01(self.land_volume);
        self.respawn_delay = non_negative(self.respawn_delay);
        self.input_enable_delay = non_negative(self.input_enable_delay);
        self
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "max_speed": 9.5, "max_air_jumps": 2 }"#).unwrap();
        assert_eq!(tuning.max_speed, 9.5);
        assert_eq!(tuning.max_air_jumps, 2);
        assert_eq!(tuning.jump_modifier, 1.5);
        assert_eq!(tuning.level_tag, "Level");
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let tuning = Tuning::from_json_str(
            r#"{ "max_hp": 0, "jump_deceleration": 4.0, "land_volume": -1.0, "max_speed": -3.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.max_hp, 1);
        assert_eq!(tuning.jump_deceleration, 1.0);
        assert_eq!(tuning.land_volume, 0.0);
        assert_eq!(tuning.max_speed, 0.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = Tuning::from_json_str("{ max_speed: }").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(err.to_string().contains("tuning.json"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let tuning = Tuning {
            max_air_jumps: 3,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json_str(&json).unwrap(), tuning);
    }
}
