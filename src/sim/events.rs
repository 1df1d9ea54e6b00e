//! Deferred gameplay reactions
//!
//! Scheduled by locomotion, health and collaborator notifications; executed by
//! the drain with access to the world, the scheduler and the hooks. An event
//! whose target has disappeared fails with an [`EventError`]; the drain logs it
//! and moves on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;
use super::checkpoint::CheckpointId;
use super::scheduler::Scheduler;
use super::state::{Entity, World};
use crate::consts::{ANIM_DEAD, ANIM_JUMPING};
use crate::hooks::{Hooks, ParticleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Left the ground (cosmetic dust)
    PlayerTookOff { player: EntityId },
    /// Became airborne after a take-off
    PlayerJumped { player: EntityId },
    /// Jump button released early
    PlayerStopJump { player: EntityId },
    /// Touched down after being airborne
    PlayerLanded { player: EntityId },
    /// Health crossed from positive to zero
    HealthIsZero { health: EntityId },
    /// Player reached a checkpoint
    ActivateCheckpoint { checkpoint: CheckpointId },
    PlayerDeath { player: EntityId },
    /// Move the player back to the spawn point
    PlayerSpawn { player: EntityId },
    EnablePlayerInput { player: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("entity {0} does not exist")]
    MissingEntity(EntityId),
    #[error("entity {0} has no health")]
    MissingHealth(EntityId),
    #[error("entity {0} has no locomotion")]
    MissingLocomotion(EntityId),
    #[error("checkpoint {0:?} does not exist")]
    MissingCheckpoint(CheckpointId),
}

/// What an executing event may touch
pub struct EventContext<'a> {
    pub world: &'a mut World,
    pub events: &'a mut Scheduler<SimEvent>,
    pub hooks: &'a mut dyn Hooks,
}

impl SimEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::PlayerTookOff { .. } => "PlayerTookOff",
            SimEvent::PlayerJumped { .. } => "PlayerJumped",
            SimEvent::PlayerStopJump { .. } => "PlayerStopJump",
            SimEvent::PlayerLanded { .. } => "PlayerLanded",
            SimEvent::HealthIsZero { .. } => "HealthIsZero",
            SimEvent::ActivateCheckpoint { .. } => "ActivateCheckpoint",
            SimEvent::PlayerDeath { .. } => "PlayerDeath",
            SimEvent::PlayerSpawn { .. } => "PlayerSpawn",
            SimEvent::EnablePlayerInput { .. } => "EnablePlayerInput",
        }
    }

    pub fn execute(self, ctx: &mut EventContext<'_>) -> Result<(), EventError> {
        match self {
            SimEvent::PlayerTookOff { player } => {
                controllable(ctx.world, player)?;
                let count = ctx.world.tuning.jump_particles;
                ctx.hooks.emit_particles(player, ParticleKind::JumpDust, count);
            }
            SimEvent::PlayerJumped { player } => {
                let entity = controllable(ctx.world, player)?;
                if let Some(clip) = entity.audio.as_ref().and_then(|a| a.jump.as_deref()) {
                    ctx.hooks.play_sound(player, clip, 1.0);
                }
                ctx.hooks.set_animator_bool(player, ANIM_JUMPING, true);
            }
            SimEvent::PlayerStopJump { player } => {
                controllable(ctx.world, player)?;
                ctx.hooks.set_animator_bool(player, ANIM_JUMPING, false);
            }
            SimEvent::PlayerLanded { player } => {
                let entity = controllable(ctx.world, player)?;
                let volume = ctx.world.tuning.land_volume;
                if let Some(clip) = entity.audio.as_ref().and_then(|a| a.jump.as_deref()) {
                    ctx.hooks.play_sound(player, clip, volume);
                }
                let count = ctx.world.tuning.land_particles;
                ctx.hooks.emit_particles(player, ParticleKind::LandDust, count);
            }
            SimEvent::HealthIsZero { health } => health_is_zero(ctx, health)?,
            SimEvent::ActivateCheckpoint { checkpoint } => {
                let position = ctx
                    .world
                    .checkpoint(checkpoint)
                    .ok_or(EventError::MissingCheckpoint(checkpoint))?
                    .position();
                ctx.world.model.spawn_point = position;
                log::info!("Checkpoint {} activated at {position}", checkpoint.0);
            }
            SimEvent::PlayerDeath { player } => player_death(ctx, player)?,
            SimEvent::PlayerSpawn { player } => player_spawn(ctx, player)?,
            SimEvent::EnablePlayerInput { player } => {
                let entity = ctx
                    .world
                    .entity_mut(player)
                    .ok_or(EventError::MissingEntity(player))?;
                let locomotion = entity
                    .locomotion
                    .as_mut()
                    .ok_or(EventError::MissingLocomotion(player))?;
                locomotion.control_enabled = true;
            }
        }
        Ok(())
    }
}

fn controllable(world: &World, id: EntityId) -> Result<&Entity, EventError> {
    let entity = world.entity(id).ok_or(EventError::MissingEntity(id))?;
    if entity.is_controllable() {
        Ok(entity)
    } else {
        Err(EventError::MissingLocomotion(id))
    }
}

fn health_is_zero(ctx: &mut EventContext<'_>, id: EntityId) -> Result<(), EventError> {
    let entity = ctx.world.entity(id).ok_or(EventError::MissingEntity(id))?;
    let health = entity.health.as_ref().ok_or(EventError::MissingHealth(id))?;
    let dead = !health.is_alive();

    ctx.hooks.on_health_zero(id);

    // Healed before the event ran: nothing to die from
    if ctx.world.model.player == Some(id) && dead {
        ctx.events.schedule(SimEvent::PlayerDeath { player: id });
    }
    Ok(())
}

fn player_death(ctx: &mut EventContext<'_>, id: EntityId) -> Result<(), EventError> {
    let entity = ctx
        .world
        .entity_mut(id)
        .ok_or(EventError::MissingEntity(id))?;
    let locomotion = entity
        .locomotion
        .as_mut()
        .ok_or(EventError::MissingLocomotion(id))?;
    locomotion.control_enabled = false;

    if let Some(clip) = entity.audio.as_ref().and_then(|a| a.ouch.as_deref()) {
        ctx.hooks.play_sound(id, clip, 1.0);
    }
    ctx.hooks.set_animator_bool(id, ANIM_DEAD, true);

    let delay = f64::from(ctx.world.tuning.respawn_delay);
    ctx.events.schedule_in(delay, SimEvent::PlayerSpawn { player: id });
    log::info!("Player {id} died, respawn in {delay:.1}s");
    Ok(())
}

fn player_spawn(ctx: &mut EventContext<'_>, id: EntityId) -> Result<(), EventError> {
    let spawn_point = ctx.world.model.spawn_point;
    let delay = f64::from(ctx.world.tuning.input_enable_delay);

    let entity = ctx
        .world
        .entity_mut(id)
        .ok_or(EventError::MissingEntity(id))?;
    let locomotion = entity
        .locomotion
        .as_mut()
        .ok_or(EventError::MissingLocomotion(id))?;
    locomotion.control_enabled = false;
    locomotion.reset();
    entity.position = spawn_point;

    if let Some(health) = entity.health.as_mut() {
        health.heal_to_max(&mut *ctx.hooks);
    }
    if let Some(clip) = entity.audio.as_ref().and_then(|a| a.respawn.as_deref()) {
        ctx.hooks.play_sound(id, clip, 1.0);
    }
    ctx.hooks.set_animator_bool(id, ANIM_DEAD, false);

    ctx.events
        .schedule_in(delay, SimEvent::EnablePlayerInput { player: id });
    log::info!("Player {id} respawned at {spawn_point}");
    Ok(())
}
