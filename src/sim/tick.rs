//! Simulation root and fixed-step tick
//!
//! A tick advances health timers and every locomotion state machine, then
//! drains the events that are due at the new time. Transitions always happen
//! before the events they schedule run, so events observe post-transition
//! state.

use glam::Vec2;

use super::EntityId;
use super::checkpoint::CheckpointId;
use super::events::{EventContext, SimEvent};
use super::locomotion::{Locomotion, TickInput};
use super::model::PlatformerModel;
use super::scheduler::{EventId, Scheduler};
use super::state::World;
use crate::hooks::{AudioClips, Hooks, NoopHooks};
use crate::tuning::Tuning;

/// Which body sensor reported a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    /// Ground probe under the character
    Feet,
    /// Probe above the character's head
    Head,
    /// Side probe for wall jumps
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Enter,
    Exit,
}

pub struct Simulation {
    world: World,
    events: Scheduler<SimEvent>,
    hooks: Box<dyn Hooks>,
    /// Simulation clock (seconds)
    time: f64,
    time_ticks: u64,
}

impl Simulation {
    /// Simulation with no-op hooks
    pub fn new(tuning: Tuning) -> Self {
        Self::with_hooks(tuning, Box::new(NoopHooks))
    }

    pub fn with_hooks(tuning: Tuning, hooks: Box<dyn Hooks>) -> Self {
        Self {
            world: World::new(tuning.clamped()),
            events: Scheduler::new(),
            hooks,
            time: 0.0,
            time_ticks: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The shared registry
    pub fn model(&self) -> &PlatformerModel {
        &self.world.model
    }

    pub fn model_mut(&mut self) -> &mut PlatformerModel {
        &mut self.world.model
    }

    pub fn events(&self) -> &Scheduler<SimEvent> {
        &self.events
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Spawn the input-driven character and make its position the spawn point
    pub fn spawn_player(&mut self, position: Vec2) -> EntityId {
        let id = self.world.spawn_controllable(position);
        self.world.model.player = Some(id);
        self.world.model.spawn_point = position;
        log::info!("Player {id} spawned at {position}");
        id
    }

    pub fn set_audio(&mut self, entity: EntityId, clips: AudioClips) {
        match self.world.entity_mut(entity) {
            Some(e) => e.audio = Some(clips),
            None => missing_collaborator(entity, "set_audio"),
        }
    }

    pub fn add_checkpoint(&mut self, position: Vec2) -> CheckpointId {
        self.world.add_checkpoint(position)
    }

    pub fn schedule(&mut self, event: SimEvent) -> EventId {
        self.events.schedule(event)
    }

    pub fn schedule_in(&mut self, delay: f64, event: SimEvent) -> EventId {
        self.events.schedule_in(delay, event)
    }

    /// Mutable payload of a queued event
    pub fn event_mut(&mut self, id: EventId) -> Option<&mut SimEvent> {
        self.events.get_mut(id)
    }

    pub fn cancel(&mut self, id: EventId) -> Option<SimEvent> {
        self.events.cancel(id)
    }

    /// Execute every event due at `now`. Failed events are logged and skipped.
    pub fn drain_due(&mut self, now: f64) -> usize {
        let Self {
            world,
            events,
            hooks,
            ..
        } = self;

        events.drain_due(now, |events, pending| {
            log::debug!("t={:.3} executing {}", pending.time, pending.event.name());
            let mut ctx = EventContext {
                world: &mut *world,
                events,
                hooks: hooks.as_mut(),
            };
            if let Err(err) = pending.event.execute(&mut ctx) {
                log::warn!("Skipped {}: {err}", pending.event.name());
            }
        })
    }

    /// Advance one fixed step: health timers, locomotion, then due events
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time_ticks += 1;
        self.time += f64::from(dt);

        let player = self.world.model.player;
        let World {
            model, entities, ..
        } = &mut self.world;

        for entity in entities.iter_mut() {
            if let Some(health) = entity.health.as_mut() {
                health.update(dt);
            }
            if let Some(locomotion) = entity.locomotion.as_mut() {
                let input = if player == Some(entity.id) {
                    *input
                } else {
                    TickInput::default()
                };
                locomotion.tick(entity.id, &input, model, &mut self.events, self.hooks.as_mut());
            }
        }

        self.drain_due(self.time);
    }

    /// Remove one hit point (the "lose health" call)
    pub fn damage(&mut self, entity: EntityId) -> bool {
        let Some(health) = self
            .world
            .entity_mut(entity)
            .and_then(|e| e.health.as_mut())
        else {
            missing_collaborator(entity, "damage");
            return false;
        };
        health.decrement(&mut self.events, self.hooks.as_mut())
    }

    /// Drop health to zero (hazards, pits)
    pub fn kill(&mut self, entity: EntityId) -> u32 {
        let Some(health) = self
            .world
            .entity_mut(entity)
            .and_then(|e| e.health.as_mut())
        else {
            missing_collaborator(entity, "kill");
            return 0;
        };
        health.die(&mut self.events, self.hooks.as_mut())
    }

    pub fn heal(&mut self, entity: EntityId) {
        match self.world.entity_mut(entity).and_then(|e| e.health.as_mut()) {
            Some(health) => health.increment(self.hooks.as_mut()),
            None => missing_collaborator(entity, "heal"),
        }
    }

    pub fn heal_to_max(&mut self, entity: EntityId) {
        match self.world.entity_mut(entity).and_then(|e| e.health.as_mut()) {
            Some(health) => health.heal_to_max(self.hooks.as_mut()),
            None => missing_collaborator(entity, "heal_to_max"),
        }
    }

    /// Ground contact from the host's contact detection
    pub fn notify_ground_contact(&mut self, entity: EntityId, grounded: bool) {
        if let Some(locomotion) = self.controllable(entity, "notify_ground_contact") {
            locomotion.set_grounded(grounded);
        }
    }

    /// Wall contact grants an extra air jump
    pub fn notify_wall_contact(&mut self, entity: EntityId) {
        if let Some(locomotion) = self.controllable(entity, "notify_wall_contact") {
            locomotion.touched_wall();
        }
    }

    /// Raw sensor trigger. Feet and head only react to level geometry.
    pub fn notify_sensor(&mut self, entity: EntityId, sensor: Sensor, tag: &str, contact: Contact) {
        let is_level = tag == self.world.tuning.level_tag;
        match (sensor, contact) {
            (Sensor::Feet, _) if is_level => {
                self.notify_ground_contact(entity, contact == Contact::Enter);
            }
            (Sensor::Head, Contact::Enter) if is_level => {
                if let Some(locomotion) = self.controllable(entity, "notify_sensor") {
                    locomotion.stop_positive_y_movement();
                }
            }
            (Sensor::Wall, Contact::Enter) => self.notify_wall_contact(entity),
            _ => {}
        }
    }

    /// A sensor started touching something tagged `tag`
    pub fn notify_collision_with(&mut self, entity: EntityId, sensor: Sensor, tag: &str) {
        self.notify_sensor(entity, sensor, tag, Contact::Enter);
    }

    /// Checkpoint trigger. Only controllable entities activate checkpoints.
    pub fn notify_checkpoint_reached(
        &mut self,
        entity: EntityId,
        checkpoint: CheckpointId,
    ) -> Option<EventId> {
        let controllable = self.world.entity(entity).is_some_and(|e| e.is_controllable());
        if !controllable {
            return None;
        }
        Some(self.events.schedule(SimEvent::ActivateCheckpoint { checkpoint }))
    }

    /// Moving-platform carry; `None` when the entity steps off
    pub fn set_platform_velocity(&mut self, entity: EntityId, velocity: Option<Vec2>) {
        if let Some(locomotion) = self.controllable(entity, "set_platform_velocity") {
            locomotion.set_platform_velocity(velocity);
        }
    }

    /// Serialized world state (determinism checks, debugging)
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.world)
    }

    /// Drop pending events (teardown)
    pub fn shutdown(&mut self) {
        log::info!(
            "Simulation shut down after {} ticks, {} events dropped",
            self.time_ticks,
            self.events.len()
        );
        self.events.clear();
    }

    fn controllable(&mut self, entity: EntityId, call: &str) -> Option<&mut Locomotion> {
        let locomotion = self.world.locomotion_mut(entity);
        if locomotion.is_none() {
            missing_collaborator(entity, call);
        }
        locomotion
    }
}

/// A collaborator addressed an entity lacking the component it needs
fn missing_collaborator(entity: EntityId, call: &str) {
    log::warn!("{call}: entity {entity} lacks the required component");
    debug_assert!(false, "{call}: entity {entity} lacks the required component");
}
