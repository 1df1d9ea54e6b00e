//! World state: entities, checkpoints and the shared registry
//!
//! Everything here is serializable and iterated in id order so two runs with
//! the same inputs produce the same state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use super::checkpoint::{Checkpoint, CheckpointId};
use super::health::Health;
use super::locomotion::Locomotion;
use super::model::PlatformerModel;
use crate::hooks::AudioClips;
use crate::tuning::Tuning;

/// A game object. Components are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Written by the host's physics, and by the core on respawn
    pub position: Vec2,
    pub health: Option<Health>,
    pub locomotion: Option<Locomotion>,
    pub audio: Option<AudioClips>,
}

impl Entity {
    pub fn new(id: EntityId, position: Vec2) -> Self {
        Self {
            id,
            position,
            health: None,
            locomotion: None,
            audio: None,
        }
    }

    /// Has a locomotion state machine
    pub fn is_controllable(&self) -> bool {
        self.locomotion.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub tuning: Tuning,
    /// Shared registry read and written by events
    pub model: PlatformerModel,
    /// Sorted by id
    pub(crate) entities: Vec<Entity>,
    /// Sorted by id, immutable after placement
    checkpoints: Vec<Checkpoint>,
    next_id: u32,
}

impl World {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            model: PlatformerModel::from_tuning(&tuning),
            tuning,
            entities: Vec::new(),
            checkpoints: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate an id (shared by entities and checkpoints)
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a bare entity
    pub fn spawn(&mut self, position: Vec2) -> EntityId {
        let id = self.next_id();
        self.entities.push(Entity::new(id, position));
        id
    }

    /// Add an entity with health sized from tuning
    pub fn spawn_with_health(&mut self, position: Vec2) -> EntityId {
        let id = self.spawn(position);
        let health = Health::from_tuning(id, &self.tuning);
        if let Some(entity) = self.entity_mut(id) {
            entity.health = Some(health);
        }
        id
    }

    /// Add a controllable entity with health and locomotion
    pub fn spawn_controllable(&mut self, position: Vec2) -> EntityId {
        let id = self.spawn_with_health(position);
        let locomotion = Locomotion::from_tuning(&self.tuning);
        if let Some(entity) = self.entity_mut(id) {
            entity.locomotion = Some(locomotion);
        }
        id
    }

    /// Remove an entity; events still pointing at it are skipped when they run
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        if self.model.player == Some(id) {
            self.model.player = None;
        }
        Some(self.entities.remove(index))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        let index = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        self.entities.get(index)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        self.entities.get_mut(index)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn health(&self, id: EntityId) -> Option<&Health> {
        self.entity(id)?.health.as_ref()
    }

    pub fn locomotion(&self, id: EntityId) -> Option<&Locomotion> {
        self.entity(id)?.locomotion.as_ref()
    }

    pub fn locomotion_mut(&mut self, id: EntityId) -> Option<&mut Locomotion> {
        self.entity_mut(id)?.locomotion.as_mut()
    }

    /// Place a checkpoint
    pub fn add_checkpoint(&mut self, position: Vec2) -> CheckpointId {
        let id = CheckpointId(self.next_id());
        self.checkpoints.push(Checkpoint::new(id, position));
        id
    }

    pub fn checkpoint(&self, id: CheckpointId) -> Option<&Checkpoint> {
        let index = self.checkpoints.binary_search_by_key(&id, |c| c.id()).ok()?;
        self.checkpoints.get(index)
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_components_follow_tuning() {
        let tuning = Tuning {
            max_hp: 5,
            max_air_jumps: 2,
            ..Default::default()
        };
        let mut world = World::new(tuning);

        let crate_box = world.spawn(Vec2::ZERO);
        let enemy = world.spawn_with_health(Vec2::X);
        let hero = world.spawn_controllable(Vec2::Y);

        assert!(world.entity(crate_box).unwrap().health.is_none());
        assert_eq!(world.health(enemy).unwrap().max_hp(), 5);
        assert!(!world.entity(enemy).unwrap().is_controllable());
        assert_eq!(world.locomotion(hero).unwrap().remaining_air_jumps(), 2);
        assert_eq!(world.health(hero).unwrap().owner(), hero);
    }

    #[test]
    fn test_ids_are_unique_and_lookup_survives_despawn() {
        let mut world = World::new(Tuning::default());
        let a = world.spawn(Vec2::ZERO);
        let checkpoint = world.add_checkpoint(Vec2::new(3.0, 4.0));
        let b = world.spawn(Vec2::ZERO);
        assert!(a < checkpoint.0 && checkpoint.0 < b);

        world.model.player = Some(a);
        assert!(world.despawn(a).is_some());
        assert!(world.entity(a).is_none());
        assert_eq!(world.model.player, None);
        assert!(world.entity(b).is_some());
        assert_eq!(
            world.checkpoint(checkpoint).map(|c| c.position()),
            Some(Vec2::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_registry_seeded_from_tuning() {
        let tuning = Tuning {
            jump_modifier: 2.5,
            jump_deceleration: 0.25,
            ..Default::default()
        };
        let world = World::new(tuning);
        assert_eq!(world.model.jump_modifier, 2.5);
        assert_eq!(world.model.jump_deceleration, 0.25);
        assert_eq!(world.model.spawn_point, Vec2::ZERO);
    }
}
