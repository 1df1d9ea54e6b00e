//! Shared world-state registry
//!
//! One instance per simulation, owned by [`super::World`] and handed to every
//! event as it executes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformerModel {
    /// Where the player reappears after dying
    pub spawn_point: Vec2,
    /// Global multiplier on jump take-off speed
    pub jump_modifier: f32,
    /// Factor applied to upward velocity on an early jump release
    pub jump_deceleration: f32,
    /// The controllable entity driven by host input
    pub player: Option<EntityId>,
}

impl PlatformerModel {
    /// Seed the live jump values from tuning
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            spawn_point: Vec2::ZERO,
            jump_modifier: tuning.jump_modifier,
            jump_deceleration: tuning.jump_deceleration,
            player: None,
        }
    }
}

impl Default for PlatformerModel {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}
