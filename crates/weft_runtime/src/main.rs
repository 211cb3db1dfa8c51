//! Weft Runtime
//!
//! Headless driver binary standing in for the platform layer: it owns the
//! tick loop and drives the ECS core from outside, the way a windowed
//! frame loop would.

mod settings;

use anyhow::Result;
use glam::Vec2;
use settings::SimulationSettings;
use std::path::Path;
use weft_ecs::ecs::{Signature, System, World};
use weft_ecs::time::{TickClock, TICK_DURATION};

#[derive(Debug, Clone, Copy)]
struct Position(Vec2);

#[derive(Debug, Clone, Copy)]
struct Velocity(Vec2);

/// Integrates motion for entities carrying both Position and Velocity.
#[derive(Default)]
struct Physics {
    gravity: f32,
}

impl System for Physics {}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Weft v{}", weft_ecs::VERSION);

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "weft.settings.json".to_string());
    let settings = SimulationSettings::load(Path::new(&settings_path))?;
    tracing::info!(?settings, "simulation configured");

    let mut world = build_world(&settings)?;
    run(&mut world, &settings)?;

    Ok(())
}

/// Populate the world before relying on any matched set.
fn build_world(settings: &SimulationSettings) -> Result<World> {
    let mut world = World::new();

    let pos = world.register_component::<Position>()?;
    let vel = world.register_component::<Velocity>()?;

    world.register_system::<Physics>()?;
    world.set_system_signature::<Physics>(Signature::EMPTY.with(pos).with(vel))?;
    world.get_system_mut::<Physics>()?.gravity = settings.gravity;

    // A named probe entity to report on at the end of the run.
    let probe = world.create_entity_named("probe");
    world.add_component(probe, Position(Vec2::new(0.0, 100.0)))?;
    world.add_component(probe, Velocity(Vec2::new(1.0, 0.0)))?;

    for i in 1..settings.entity_count {
        let entity = world.create_entity();
        world.add_component(entity, Position(Vec2::new(i as f32, 0.0)))?;
        // Leave every fourth entity static: Position only, so the physics
        // system never sees it.
        if i % 4 != 0 {
            world.add_component(entity, Velocity(Vec2::new(0.0, i as f32)))?;
        }
    }

    tracing::info!(
        entities = world.entity_count(),
        moving = world.system_entities::<Physics>()?.len(),
        "world populated"
    );
    Ok(world)
}

/// Fixed-rate loop: feed frame-sized slices of time into the clock and run
/// one physics pass per whole tick it hands back.
fn run(world: &mut World, settings: &SimulationSettings) -> Result<()> {
    let mut clock = TickClock::new();
    let dt = clock.tick_duration().as_secs_f32();

    while clock.tick_count() < u64::from(settings.tick_count) {
        for _ in 0..clock.advance(TICK_DURATION) {
            step_physics(world, dt)?;
        }
    }

    let probe = world
        .find_by_name("probe")
        .expect("probe entity exists for the whole run");
    let position = world.get_component::<Position>(probe)?.0;
    tracing::info!(
        ticks = clock.tick_count(),
        simulated_secs = clock.total_time().as_secs_f32(),
        probe_x = position.x,
        probe_y = position.y,
        "simulation finished"
    );
    Ok(())
}

/// One physics tick over the system's matched set.
fn step_physics(world: &mut World, dt: f32) -> Result<()> {
    let gravity = world.get_system::<Physics>()?.gravity;
    // Snapshot the matched ids; component mutation below must not alias
    // the registry borrow.
    let matched: Vec<_> = world.system_entities::<Physics>()?.iter().copied().collect();

    for entity in matched {
        let velocity = {
            let velocity = world.get_component_mut::<Velocity>(entity)?;
            velocity.0.y += gravity * dt;
            *velocity
        };
        world.get_component_mut::<Position>(entity)?.0 += velocity.0 * dt;
    }
    Ok(())
}
