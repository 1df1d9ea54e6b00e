//! Platformer core headless demo
//!
//! Runs the autopilot on a flat floor and logs what the core does.
//! Usage: `platformer-core [tuning.json] [-v]`

use glam::Vec2;

use platformer_core::consts::{DEFAULT_LEVEL_TAG, SIM_DT};
use platformer_core::pilot::{Autopilot, FlatGround};
use platformer_core::sim::{Sensor, Simulation};
use platformer_core::{AudioClips, LogHooks, Tuning, logging};

const DEMO_TICKS: u32 = 60 * 20;
const DEMO_SEED: u64 = 0x5eed;
const CHECKPOINT_X: f32 = 12.0;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    logging::init(verbose);

    let tuning = match args.iter().find(|a| !a.starts_with('-')) {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Platformer core (headless) starting...");

    let mut sim = Simulation::with_hooks(tuning, Box::new(LogHooks));
    let player = sim.spawn_player(Vec2::ZERO);
    sim.set_audio(
        player,
        AudioClips {
            jump: Some("jump".into()),
            respawn: Some("respawn".into()),
            ouch: Some("ouch".into()),
        },
    );
    let checkpoint = sim.add_checkpoint(Vec2::new(CHECKPOINT_X, 0.0));

    let ground = FlatGround::default();
    let mut pilot = Autopilot::new(DEMO_SEED);
    let mut checkpoint_reached = false;

    for tick in 0..DEMO_TICKS {
        let input = pilot.next_input(&sim);
        sim.tick(&input, SIM_DT);
        ground.step(&mut sim, player, SIM_DT);

        let x = sim
            .world()
            .entity(player)
            .map(|e| e.position.x)
            .unwrap_or_default();

        if !checkpoint_reached && x.abs() >= CHECKPOINT_X {
            checkpoint_reached = sim.notify_checkpoint_reached(player, checkpoint).is_some();
        }
        // Brush against a wall every few seconds
        if tick % 240 == 120 {
            sim.notify_collision_with(player, Sensor::Wall, DEFAULT_LEVEL_TAG);
        }
        // Spikes halfway through
        if tick == DEMO_TICKS / 2 {
            sim.damage(player);
            sim.kill(player);
        }
    }

    match sim.snapshot_json() {
        Ok(json) => log::info!("Final state: {json}"),
        Err(err) => log::error!("Failed to serialize world: {err}"),
    }
    sim.shutdown();
}
