//! Headless sandbox: a box floor, a rain of bouncing spheres, and event
//! logging to watch the spatial index and collision pipeline at work.
//!
//! Pass a TOML config path as the first argument to override the defaults,
//! and set `RUST_LOG=debug` for per-event output.

use sim_engine::foundation::logging;
use sim_engine::prelude::*;

const SIMULATED_SECONDS: f32 = 10.0;

fn build_world(config: SimConfig) -> (World, Vec<ObjectId>) {
    let mut world = World::new(config);

    // Immovable floor slab just below the origin
    world.spawn(
        GameObject::at(Vec3::new(0.0, -2.0, 0.0))
            .with_collider(CollisionShape::cuboid(Vec3::new(40.0, 1.0, 40.0)))
            .with_body(RigidBody::fixed()),
    );

    // A grid of spheres dropped from staggered heights
    let mut spheres = Vec::new();
    for row in 0..4 {
        for col in 0..4 {
            let position = Vec3::new(
                -12.0 + 8.0 * col as f32,
                10.0 + 3.0 * row as f32,
                -12.0 + 8.0 * row as f32,
            );
            let id = world.spawn(
                GameObject::at(position)
                    .with_collider(CollisionShape::sphere(1.0))
                    .with_body(RigidBody::new(1.0).with_restitution(0.7)),
            );
            spheres.push(id);
        }
    }
    (world, spheres)
}

fn main() -> Result<(), ConfigError> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading configuration from {path}");
            SimConfig::load_from_file(&path)?
        }
        None => SimConfig::default(),
    };
    let timestep = config.physics.timestep;

    let (mut world, spheres) = build_world(config);
    log::info!(
        "spawned {} objects ({} spheres + floor)",
        world.len(),
        spheres.len()
    );

    let ticks = (SIMULATED_SECONDS / timestep) as u32;
    let mut impacts = 0usize;
    for tick in 0..ticks {
        world.step(timestep);

        for pair in world.collisions_entered() {
            impacts += 1;
            log::debug!(
                "tick {tick}: contact started between {:?} and {:?}",
                pair.first,
                pair.second
            );
        }
        for pair in world.collisions_exited() {
            log::debug!(
                "tick {tick}: contact ended between {:?} and {:?}",
                pair.first,
                pair.second
            );
        }

        if tick % 60 == 0 {
            log::info!(
                "t={:>5.2}s cells={} index entries={} active contacts={}",
                tick as f32 * timestep,
                world.octree().cell_count(),
                world.octree().occupant_entries(),
                world.active_collisions().len()
            );
        }
    }

    let resting = spheres
        .iter()
        .filter_map(|&id| world.object(id))
        .filter(|object| object.transform.position.y < 0.5)
        .count();
    log::info!(
        "done: {impacts} impacts over {SIMULATED_SECONDS}s, {resting}/{} spheres settled near the floor",
        spheres.len()
    );
    Ok(())
}
