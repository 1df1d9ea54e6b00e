//! Headless drivers
//!
//! [`Autopilot`] plays the character like an idle/demo mode, from a seeded RNG
//! so runs are reproducible. [`FlatGround`] stands in for the host physics:
//! gravity, integration and floor contact against a single infinite floor.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{EntityId, JumpState, Simulation, TickInput};

/// Seeded input generator for the player
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    heading: f32,
    jump_held: bool,
    hold_ticks: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            heading: 1.0,
            jump_held: false,
            hold_ticks: 0,
        }
    }

    /// Decide this tick's input from the player's current state
    pub fn next_input(&mut self, sim: &Simulation) -> TickInput {
        let Some(locomotion) = sim.model().player.and_then(|id| sim.world().locomotion(id)) else {
            return TickInput::default();
        };

        // Wander, changing direction now and then
        if self.rng.random_bool(0.02) {
            self.heading = self.rng.random_range(-1.0..=1.0);
        }
        let mut input = TickInput::walk(self.heading);

        if self.jump_held {
            self.hold_ticks = self.hold_ticks.saturating_sub(1);
            if self.hold_ticks == 0 {
                self.jump_held = false;
                input.jump_released = true;
            }
            return input;
        }

        let wants_jump = match locomotion.jump_state() {
            JumpState::Grounded => self.rng.random_bool(0.03),
            // Air jump near the top of the arc
            JumpState::InFlight => {
                locomotion.remaining_air_jumps() > 0
                    && locomotion.velocity.y < 0.0
                    && self.rng.random_bool(0.1)
            }
            _ => false,
        };
        if wants_jump {
            input.jump_pressed = true;
            self.jump_held = true;
            self.hold_ticks = self.rng.random_range(2..30);
        }
        input
    }
}

/// Gravity plus an infinite floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub floor: f32,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self {
            floor: 0.0,
            gravity: -20.0,
        }
    }
}

impl FlatGround {
    /// Move `entity` by its velocity and report floor contact changes
    pub fn step(&self, sim: &mut Simulation, entity: EntityId, dt: f32) {
        let Some(body) = sim.world_mut().entity_mut(entity) else {
            return;
        };
        let Some(locomotion) = body.locomotion.as_mut() else {
            return;
        };

        let was_grounded = locomotion.is_grounded();
        if !was_grounded || locomotion.velocity.y > 0.0 {
            locomotion.velocity.y += self.gravity * dt;
        }
        body.position += locomotion.desired_velocity() * dt;

        let on_floor = body.position.y <= self.floor;
        if on_floor {
            body.position.y = self.floor;
            locomotion.velocity.y = locomotion.velocity.y.max(0.0);
        }

        if on_floor != was_grounded {
            sim.notify_ground_contact(entity, on_floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn run(seed: u64, ticks: u32) -> (Simulation, Vec<JumpState>) {
        let mut sim = Simulation::new(Tuning::default());
        let player = sim.spawn_player(Vec2::ZERO);
        let ground = FlatGround::default();
        let mut pilot = Autopilot::new(seed);
        let mut states = Vec::new();

        for _ in 0..ticks {
            let input = pilot.next_input(&sim);
            sim.tick(&input, SIM_DT);
            ground.step(&mut sim, player, SIM_DT);
            states.push(sim.world().locomotion(player).unwrap().jump_state());
        }
        (sim, states)
    }

    #[test]
    fn test_same_seed_same_run() {
        let (a, _) = run(7, 600);
        let (b, _) = run(7, 600);
        assert_eq!(a.snapshot_json().unwrap(), b.snapshot_json().unwrap());
    }

    #[test]
    fn test_autopilot_completes_jumps() {
        let (_, states) = run(11, 1200);
        assert!(states.contains(&JumpState::InFlight));
        assert!(states.contains(&JumpState::Landed));
        // Landed is a one-tick pulse that always settles to Grounded
        for pair in states.windows(2) {
            if pair[0] == JumpState::Landed {
                assert_eq!(pair[1], JumpState::Grounded);
            }
        }
    }

    #[test]
    fn test_flat_ground_full_arc() {
        let mut sim = Simulation::new(Tuning::default());
        let player = sim.spawn_player(Vec2::ZERO);
        let ground = FlatGround::default();

        sim.tick(&TickInput::press_jump(), SIM_DT);
        ground.step(&mut sim, player, SIM_DT);

        let mut peak: f32 = 0.0;
        let mut landed = false;
        for _ in 0..240 {
            sim.tick(&TickInput::default(), SIM_DT);
            ground.step(&mut sim, player, SIM_DT);
            let entity = sim.world().entity(player).unwrap();
            peak = peak.max(entity.position.y);
            if entity.locomotion.as_ref().unwrap().jump_state() == JumpState::Landed {
                landed = true;
            }
        }

        assert!(peak > 1.0);
        assert!(landed);
        let entity = sim.world().entity(player).unwrap();
        assert_eq!(entity.position.y, 0.0);
        assert_eq!(entity.locomotion.as_ref().unwrap().jump_state(), JumpState::Grounded);
    }
}
