//! Jump/ground state machine and velocity for a controllable character
//!
//! Each tick runs three phases in order:
//! 1. advance the jump state from what was decided last tick
//! 2. read this tick's input edges (may queue a jump for the next tick)
//! 3. compute velocity from the flags the first two phases left behind
//!
//! State graph: `Grounded -> PrepareToJump -> Jumping -> InFlight -> Landed -> Grounded`.
//! An air jump re-enters `PrepareToJump` from `Jumping`/`InFlight` and spends
//! one unit of the air-jump budget on the following transition to `Jumping`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use super::events::SimEvent;
use super::model::PlatformerModel;
use super::scheduler::Scheduler;
use crate::consts::{ANIM_GROUNDED, ANIM_VELOCITY_X, FACING_DEADZONE};
use crate::hooks::Hooks;
use crate::sanitize_axis;
use crate::tuning::Tuning;

/// Jump progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpState {
    #[default]
    Grounded,
    /// Jump requested, take-off happens next tick
    PrepareToJump,
    /// Take-off impulse applied, still waiting to leave the ground
    Jumping,
    InFlight,
    /// One-tick pulse after touching down
    Landed,
}

impl JumpState {
    /// States in which a jump press is an air jump
    pub fn is_airborne(self) -> bool {
        matches!(self, JumpState::Jumping | JumpState::InFlight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// Control snapshot for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Horizontal intent in [-1, 1]
    pub horizontal: f32,
    /// Jump button went down this tick
    pub jump_pressed: bool,
    /// Jump button went up this tick
    pub jump_released: bool,
}

impl TickInput {
    pub fn walk(horizontal: f32) -> Self {
        Self {
            horizontal,
            ..Default::default()
        }
    }

    pub fn press_jump() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }

    pub fn release_jump() -> Self {
        Self {
            jump_released: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locomotion {
    /// Max horizontal speed
    pub max_speed: f32,
    /// Vertical take-off speed before the registry's jump modifier
    pub jump_take_off_speed: f32,
    /// When false, input is ignored but the jump progression still runs
    pub control_enabled: bool,
    /// Velocity owned by the character (host physics may integrate gravity into y)
    pub velocity: Vec2,

    max_air_jumps: u32,
    jump_state: JumpState,
    remaining_air_jumps: u32,
    is_air_jumping: bool,
    /// Take-off is ready to be applied by velocity computation
    jump: bool,
    /// Early release waiting to cut upward velocity
    stop_jump: bool,
    grounded: bool,
    /// Velocity of a carrying platform; being carried forces ground contact
    platform_velocity: Option<Vec2>,
    move_x: f32,
    target_velocity: Vec2,
    facing: Facing,
}

impl Locomotion {
    pub fn new(max_speed: f32, jump_take_off_speed: f32, max_air_jumps: u32) -> Self {
        Self {
            max_speed,
            jump_take_off_speed,
            control_enabled: true,
            velocity: Vec2::ZERO,
            max_air_jumps,
            jump_state: JumpState::Grounded,
            remaining_air_jumps: max_air_jumps,
            is_air_jumping: false,
            jump: false,
            stop_jump: false,
            grounded: true,
            platform_velocity: None,
            move_x: 0.0,
            target_velocity: Vec2::ZERO,
            facing: Facing::Right,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.max_speed,
            tuning.jump_take_off_speed,
            tuning.max_air_jumps,
        )
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump_state
    }

    pub fn max_air_jumps(&self) -> u32 {
        self.max_air_jumps
    }

    pub fn remaining_air_jumps(&self) -> u32 {
        self.remaining_air_jumps
    }

    pub fn is_air_jumping(&self) -> bool {
        self.is_air_jumping
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Horizontal intent times max speed
    pub fn target_velocity(&self) -> Vec2 {
        self.target_velocity
    }

    /// Ground contact as the state machine sees it (platform carry counts)
    pub fn is_grounded(&self) -> bool {
        self.grounded || self.platform_velocity.is_some()
    }

    /// Velocity the host should move the body by, including platform carry
    pub fn desired_velocity(&self) -> Vec2 {
        match self.platform_velocity {
            Some(carry) => self.velocity + Vec2::new(carry.x, carry.y * 2.0),
            None => self.velocity,
        }
    }

    /// Ground contact from the host's contact detection
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Start or stop being carried by a moving platform
    pub fn set_platform_velocity(&mut self, velocity: Option<Vec2>) {
        self.platform_velocity = velocity.filter(|v| v.is_finite());
    }

    /// Wall contact grants one extra air jump (uncapped)
    pub fn touched_wall(&mut self) {
        self.remaining_air_jumps = self.remaining_air_jumps.saturating_add(1);
        log::debug!("Wall touch, air jumps now {}", self.remaining_air_jumps);
    }

    /// Head bump: cancel upward motion
    pub fn stop_positive_y_movement(&mut self) {
        if self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
    }

    /// Back on the ground at rest, budget restored (used on respawn)
    pub fn reset(&mut self) {
        self.jump_state = JumpState::Grounded;
        self.remaining_air_jumps = self.max_air_jumps;
        self.is_air_jumping = false;
        self.jump = false;
        self.stop_jump = false;
        self.velocity = Vec2::ZERO;
        self.target_velocity = Vec2::ZERO;
        self.move_x = 0.0;
    }

    /// Advance one simulation step
    pub fn tick(
        &mut self,
        owner: EntityId,
        input: &TickInput,
        model: &PlatformerModel,
        events: &mut Scheduler<SimEvent>,
        hooks: &mut dyn Hooks,
    ) {
        self.update_jump_state(owner, model, events);
        self.read_input(owner, input, events);
        self.compute_velocity(owner, model, hooks);
    }

    fn update_jump_state(
        &mut self,
        owner: EntityId,
        model: &PlatformerModel,
        events: &mut Scheduler<SimEvent>,
    ) {
        self.jump = false;
        let previous = self.jump_state;

        match self.jump_state {
            JumpState::Grounded => {}
            JumpState::PrepareToJump => {
                self.jump_state = JumpState::Jumping;
                self.jump = true;
                self.stop_jump = false;
                events.schedule(SimEvent::PlayerTookOff { player: owner });
                if self.is_air_jumping {
                    self.do_air_jump(model);
                }
            }
            JumpState::Jumping => {
                if !self.is_grounded() {
                    events.schedule(SimEvent::PlayerJumped { player: owner });
                    self.jump_state = JumpState::InFlight;
                }
            }
            JumpState::InFlight => {
                if self.is_grounded() {
                    events.schedule(SimEvent::PlayerLanded { player: owner });
                    self.jump_state = JumpState::Landed;
                }
            }
            JumpState::Landed => {
                self.jump_state = JumpState::Grounded;
                self.remaining_air_jumps = self.max_air_jumps;
            }
        }

        if previous != self.jump_state {
            log::debug!("Entity {owner}: {previous:?} -> {:?}", self.jump_state);
        }
    }

    fn do_air_jump(&mut self, model: &PlatformerModel) {
        if self.remaining_air_jumps == 0 {
            return;
        }
        self.remaining_air_jumps -= 1;
        self.velocity.y = self.jump_take_off_speed * model.jump_modifier;
        self.jump = false;
    }

    fn can_start_jump(&self) -> bool {
        match self.jump_state {
            JumpState::Grounded => true,
            JumpState::Jumping | JumpState::InFlight => self.remaining_air_jumps > 0,
            // Landed always settles to Grounded first
            JumpState::PrepareToJump | JumpState::Landed => false,
        }
    }

    fn read_input(&mut self, owner: EntityId, input: &TickInput, events: &mut Scheduler<SimEvent>) {
        self.is_air_jumping = false;

        if !self.control_enabled {
            self.move_x = 0.0;
            return;
        }

        self.move_x = sanitize_axis(input.horizontal);

        if input.jump_pressed && self.can_start_jump() {
            self.is_air_jumping = self.jump_state.is_airborne();
            self.jump_state = JumpState::PrepareToJump;
        } else if input.jump_released && self.jump_state.is_airborne() {
            self.stop_jump = true;
            events.schedule(SimEvent::PlayerStopJump { player: owner });
        }
    }

    fn compute_velocity(&mut self, owner: EntityId, model: &PlatformerModel, hooks: &mut dyn Hooks) {
        let grounded = self.is_grounded();

        if self.jump && grounded {
            self.velocity.y = self.jump_take_off_speed * model.jump_modifier;
            self.jump = false;
        } else if self.stop_jump {
            self.stop_jump = false;
            if self.velocity.y > 0.0 {
                self.velocity.y *= model.jump_deceleration;
            }
        }

        if self.move_x > FACING_DEADZONE {
            self.facing = Facing::Right;
        } else if self.move_x < -FACING_DEADZONE {
            self.facing = Facing::Left;
        }

        self.target_velocity = Vec2::new(self.move_x * self.max_speed, 0.0);
        self.velocity.x = self.target_velocity.x;

        let speed_ratio = if self.max_speed > 0.0 {
            self.velocity.x.abs() / self.max_speed
        } else {
            0.0
        };
        hooks.set_animator_bool(owner, ANIM_GROUNDED, grounded);
        hooks.set_animator_float(owner, ANIM_VELOCITY_X, speed_ratio);
    }
}
