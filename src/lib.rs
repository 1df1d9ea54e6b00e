//! Platformer Core - deterministic gameplay core for a 2D platformer
//!
//! Core modules:
//! - `sim`: Locomotion state machine, health, deferred event scheduler
//! - `hooks`: Side-effect boundary (audio, animator, particles, health display)
//! - `tuning`: Data-driven game balance
//! - `pilot`: Seeded autopilot and flat-ground host stand-in for demos
//! - `logging`: Logger setup for hosts

pub mod hooks;
pub mod logging;
pub mod pilot;
pub mod sim;
pub mod tuning;

pub use hooks::{AudioClips, Hooks, LogHooks, NoopHooks, ParticleKind};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Horizontal intent needed before the character turns around
    pub const FACING_DEADZONE: f32 = 0.01;

    /// Collider tag that marks walkable level geometry
    pub const DEFAULT_LEVEL_TAG: &str = "Level";

    /// Animator parameter names fed by the core
    pub const ANIM_GROUNDED: &str = "grounded";
    pub const ANIM_VELOCITY_X: &str = "velocityX";
    pub const ANIM_JUMPING: &str = "jumping";
    pub const ANIM_DEAD: &str = "dead";
}

/// Clamp a control axis to [-1, 1], treating NaN/inf as no input
#[inline]
pub fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Clamp to [0, 1], treating NaN as 0
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_axis() {
        assert_eq!(sanitize_axis(0.5), 0.5);
        assert_eq!(sanitize_axis(3.0), 1.0);
        assert_eq!(sanitize_axis(-7.0), -1.0);
        assert_eq!(sanitize_axis(f32::NAN), 0.0);
        assert_eq!(sanitize_axis(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert!((clamp01(0.4) - 0.4).abs() < f32::EPSILON);
    }
}
