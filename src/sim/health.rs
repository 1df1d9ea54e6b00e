//! Hit points with an invincibility window and death signalling
//!
//! HP moves one point per call and is clamped to [0, max]. Only the call that
//! takes HP from positive to zero schedules [`SimEvent::HealthIsZero`].

use serde::{Deserialize, Serialize};

use super::EntityId;
use super::events::SimEvent;
use super::scheduler::Scheduler;
use crate::hooks::Hooks;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    owner: EntityId,
    max_hp: u32,
    current_hp: u32,
    invincibility_duration: f32,
    /// Seconds left; negative means the window was forcibly disabled
    invincibility_remaining: f32,
    /// Ignore damage while the invincibility window runs
    gates_damage: bool,
}

impl Health {
    /// Full health, no damage gate
    pub fn new(owner: EntityId, max_hp: u32, invincibility_duration: f32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            owner,
            max_hp,
            current_hp: max_hp,
            invincibility_duration: invincibility_duration.max(0.0),
            invincibility_remaining: 0.0,
            gates_damage: false,
        }
    }

    pub fn from_tuning(owner: EntityId, tuning: &Tuning) -> Self {
        Self::new(owner, tuning.max_hp, tuning.invincibility_duration)
            .with_damage_gate(tuning.invincibility_gates_damage)
    }

    pub fn with_damage_gate(mut self, gates_damage: bool) -> Self {
        self.gates_damage = gates_damage;
        self
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn invincibility_remaining(&self) -> f32 {
        self.invincibility_remaining
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining > 0.0
    }

    /// Current / max in [0, 1]
    pub fn percentage(&self) -> f32 {
        crate::clamp01(self.current_hp as f32 / self.max_hp as f32)
    }

    /// Add one hit point (capped at max)
    pub fn increment(&mut self, hooks: &mut dyn Hooks) {
        self.current_hp = (self.current_hp + 1).min(self.max_hp);
        self.notify(hooks);
    }

    /// Remove one hit point and start the invincibility window.
    ///
    /// Returns false when the damage gate swallowed the hit.
    pub fn decrement(&mut self, events: &mut Scheduler<SimEvent>, hooks: &mut dyn Hooks) -> bool {
        if self.gates_damage && self.is_invincible() {
            log::debug!("Entity {} invincible, damage ignored", self.owner);
            return false;
        }

        let was_alive = self.is_alive();
        self.current_hp = self.current_hp.saturating_sub(1);
        if was_alive && self.current_hp == 0 {
            log::debug!("Entity {} health reached zero", self.owner);
            events.schedule(SimEvent::HealthIsZero { health: self.owner });
        }

        self.invincibility_remaining = self.invincibility_duration;
        self.notify(hooks);
        true
    }

    /// Decrement until HP reaches zero, bypassing invincibility.
    /// Returns the number of decrements applied.
    pub fn die(&mut self, events: &mut Scheduler<SimEvent>, hooks: &mut dyn Hooks) -> u32 {
        let mut steps = 0;
        while self.current_hp > 0 {
            self.invincibility_remaining = -1.0;
            if self.decrement(events, hooks) {
                steps += 1;
            }
        }
        steps
    }

    /// Increment until HP reaches max (no event)
    pub fn heal_to_max(&mut self, hooks: &mut dyn Hooks) {
        while self.current_hp < self.max_hp {
            self.increment(hooks);
        }
    }

    /// Decay the invincibility window
    pub fn update(&mut self, dt: f32) {
        if self.invincibility_remaining > 0.0 {
            self.invincibility_remaining -= dt;
        }
    }

    fn notify(&self, hooks: &mut dyn Hooks) {
        hooks.health_changed(self.owner, self.percentage());
    }
}
