//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host supplies the timestep, input edges and contact notifications
//! - Stable iteration order (by entity ID)
//! - Events run only from a drain, never inline
//! - No rendering, audio or platform dependencies (see `crate::hooks`)

pub mod checkpoint;
pub mod events;
pub mod health;
pub mod locomotion;
pub mod model;
pub mod scheduler;
pub mod state;
pub mod tick;

/// Opaque entity identity
pub type EntityId = u32;

pub use checkpoint::{Checkpoint, CheckpointId};
pub use events::{EventContext, EventError, SimEvent};
pub use health::Health;
pub use locomotion::{Facing, JumpState, Locomotion, TickInput};
pub use model::PlatformerModel;
pub use scheduler::{EventId, Pending, Scheduler};
pub use state::{Entity, World};
pub use tick::{Contact, Sensor, Simulation};
