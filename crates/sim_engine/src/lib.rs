//! # Sim Engine
//!
//! A hobbyist real-time 3D simulation engine core.
//!
//! ## Features
//!
//! - **Octree Spatial Index**: Incremental occupancy tracking avoids
//!   full-tree rebuilds as objects move
//! - **Collision Pipeline**: Broad-phase candidate generation from leaf
//!   occupancy plus narrow-phase contact tests
//! - **Rigid Bodies**: Linear impulse response with restitution
//! - **Frame-Stepped**: Single-threaded, deterministic tick loop
//!
//! ## Quick Start
//!
//! ```rust
//! use sim_engine::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = SimConfig::default();
//!     let mut world = World::new(config);
//!
//!     let ball = world.spawn(
//!         GameObject::at(Vec3::new(0.0, 10.0, 0.0))
//!             .with_collider(CollisionShape::sphere(1.0))
//!             .with_body(RigidBody::new(1.0)),
//!     );
//!
//!     world.step(1.0 / 60.0);
//!     assert!(world.object(ball).is_some());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;
pub mod world;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{ConfigError, SimConfig},
        foundation::{
            math::{Quat, Transform, Vec3},
            time::FixedStep,
        },
        physics::{CollisionPair, CollisionPipeline, CollisionShape, Contact, RigidBody},
        scene::Aabb,
        spatial::{CellId, CellStatus, Containment, OccupancyTracker, Octree, OctreeConfig},
        world::{GameObject, ObjectId, World},
    };
}
