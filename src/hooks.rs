//! Side-effect hooks
//!
//! The only touch points with audio, animation, particles and UI. The core
//! calls these; integrators implement whichever they care about and leave the
//! rest as the default no-ops.

use serde::{Deserialize, Serialize};

use crate::sim::EntityId;

/// Particle bursts the core asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Dust kicked up when leaving the ground
    JumpDust,
    /// Dust kicked up on landing
    LandDust,
}

/// Sound clips owned by a controllable entity (any may be missing)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClips {
    pub jump: Option<String>,
    pub respawn: Option<String>,
    pub ouch: Option<String>,
}

/// Integrator-supplied side effects
pub trait Hooks {
    /// Play a one-shot clip at the given volume (0.0 - 1.0)
    fn play_sound(&mut self, _entity: EntityId, _clip: &str, _volume: f32) {}

    fn set_animator_bool(&mut self, _entity: EntityId, _name: &str, _value: bool) {}

    fn set_animator_float(&mut self, _entity: EntityId, _name: &str, _value: f32) {}

    /// Health display update; `percentage` is current/max in [0, 1]
    fn health_changed(&mut self, _entity: EntityId, _percentage: f32) {}

    fn emit_particles(&mut self, _entity: EntityId, _kind: ParticleKind, _count: u32) {}

    /// Death reaction, called once per transition of an entity's health to zero
    fn on_health_zero(&mut self, _entity: EntityId) {}
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl Hooks for NoopHooks {}

/// Hooks that forward everything to the `log` facade (used by the headless demo)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHooks;

impl Hooks for LogHooks {
    fn play_sound(&mut self, entity: EntityId, clip: &str, volume: f32) {
        log::info!("[{entity}] sound {clip} @ {volume:.2}");
    }

    fn set_animator_bool(&mut self, entity: EntityId, name: &str, value: bool) {
        log::trace!("[{entity}] animator {name} = {value}");
    }

    fn set_animator_float(&mut self, entity: EntityId, name: &str, value: f32) {
        log::trace!("[{entity}] animator {name} = {value:.3}");
    }

    fn health_changed(&mut self, entity: EntityId, percentage: f32) {
        log::info!("[{entity}] health {:.0}%", percentage * 100.0);
    }

    fn emit_particles(&mut self, entity: EntityId, kind: ParticleKind, count: u32) {
        log::debug!("[{entity}] {count} x {kind:?}");
    }

    fn on_health_zero(&mut self, entity: EntityId) {
        log::info!("[{entity}] health reached zero");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One recorded hook invocation
    #[derive(Debug, Clone, PartialEq)]
    pub enum HookCall {
        Sound {
            entity: EntityId,
            clip: String,
            volume: f32,
        },
        AnimatorBool {
            entity: EntityId,
            name: String,
            value: bool,
        },
        AnimatorFloat {
            entity: EntityId,
            name: String,
            value: f32,
        },
        HealthChanged {
            entity: EntityId,
            percentage: f32,
        },
        Particles {
            entity: EntityId,
            kind: ParticleKind,
            count: u32,
        },
        HealthZero {
            entity: EntityId,
        },
    }

    /// Records every call; clones share the same log so a test can keep a
    /// handle after boxing one into a simulation
    #[derive(Debug, Default, Clone)]
    pub struct RecordingHooks {
        calls: std::rc::Rc<std::cell::RefCell<Vec<HookCall>>>,
    }

    impl RecordingHooks {
        pub fn calls(&self) -> Vec<HookCall> {
            self.calls.borrow().clone()
        }

        pub fn health_zero_count(&self, entity: EntityId) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| matches!(c, HookCall::HealthZero { entity: e } if *e == entity))
                .count()
        }

        pub fn sounds(&self) -> Vec<(String, f32)> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    HookCall::Sound { clip, volume, .. } => Some((clip.clone(), *volume)),
                    _ => None,
                })
                .collect()
        }

        pub fn particles(&self) -> Vec<(ParticleKind, u32)> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    HookCall::Particles { kind, count, .. } => Some((*kind, *count)),
                    _ => None,
                })
                .collect()
        }

        /// Last value written to an animator bool, if any
        pub fn animator_bool(&self, name: &str) -> Option<bool> {
            self.calls.borrow().iter().rev().find_map(|c| match c {
                HookCall::AnimatorBool { name: n, value, .. } if n == name => Some(*value),
                _ => None,
            })
        }

        pub fn health_percentages(&self) -> Vec<f32> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    HookCall::HealthChanged { percentage, .. } => Some(*percentage),
                    _ => None,
                })
                .collect()
        }

        fn push(&self, call: HookCall) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl Hooks for RecordingHooks {
        fn play_sound(&mut self, entity: EntityId, clip: &str, volume: f32) {
            self.push(HookCall::Sound {
                entity,
                clip: clip.to_string(),
                volume,
            });
        }

        fn set_animator_bool(&mut self, entity: EntityId, name: &str, value: bool) {
            self.push(HookCall::AnimatorBool {
                entity,
                name: name.to_string(),
                value,
            });
        }

        fn set_animator_float(&mut self, entity: EntityId, name: &str, value: f32) {
            self.push(HookCall::AnimatorFloat {
                entity,
                name: name.to_string(),
                value,
            });
        }

        fn health_changed(&mut self, entity: EntityId, percentage: f32) {
            self.push(HookCall::HealthChanged { entity, percentage });
        }

        fn emit_particles(&mut self, entity: EntityId, kind: ParticleKind, count: u32) {
            self.push(HookCall::Particles {
                entity,
                kind,
                count,
            });
        }

        fn on_health_zero(&mut self, entity: EntityId) {
            self.push(HookCall::HealthZero { entity });
        }
    }
}
