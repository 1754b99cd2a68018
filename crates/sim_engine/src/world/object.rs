//! Game objects and their stable handles

use crate::foundation::collections::new_key_type;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{CollisionShape, RigidBody};

new_key_type! {
    /// Stable handle to a game object
    ///
    /// Generational: despawning an object invalidates its id, and the slot
    /// can be reused without old handles resolving to the new occupant.
    pub struct ObjectId;
}

/// A simulated object: a transform plus optional collision and dynamics
///
/// An object with a collider participates in the spatial index and collision
/// detection; one with a body is integrated each tick. Either can be absent:
/// a collider-only object is static scenery, a body-only object is a
/// non-colliding particle.
#[derive(Debug, Clone, Default)]
pub struct GameObject {
    /// World-space placement
    pub transform: Transform,
    /// Collision shape, if this object collides
    pub collider: Option<CollisionShape>,
    /// Dynamics state, if this object is physics-driven
    pub body: Option<RigidBody>,
}

impl GameObject {
    /// Create an empty object at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object at a position
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Self::default()
        }
    }

    /// Attach a collision shape
    pub fn with_collider(mut self, collider: CollisionShape) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Attach a rigid body
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the object's scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }
}
