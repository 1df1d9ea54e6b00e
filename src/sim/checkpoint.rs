//! Checkpoints: fixed positions placed at level load

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckpointId(pub u32);

/// Immutable once placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    id: CheckpointId,
    position: Vec2,
}

impl Checkpoint {
    pub fn new(id: CheckpointId, position: Vec2) -> Self {
        Self { id, position }
    }

    pub fn id(&self) -> CheckpointId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}
