//! Collision shape abstractions
//!
//! Shapes are stored in model space and reduced to world-space bounding
//! extents on demand. The broad phase only ever sees those extents; the
//! narrow phase refines sphere tests but treats boxes and hulls by their
//! axis-aligned bounds.

use crate::foundation::math::{Transform, Vec3};
use crate::scene::Aabb;

/// Collision shape discriminant (model space)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// A spherical shape; position comes from the owning object's transform
    Sphere {
        /// Radius in world units (not scaled by the transform)
        radius: f32,
    },
    /// An axis-aligned box around the object's position
    Box {
        /// Half-extent along each axis, in model units
        half_extents: Vec3,
    },
    /// A convex hull described by its support points in model space
    ConvexHull {
        /// Hull vertices relative to the object's origin
        points: Vec<Vec3>,
    },
}

impl CollisionShape {
    /// Creates a spherical collision shape with the given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Creates an axis-aligned box shape with the given half-extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    /// Creates a convex hull shape from its support points
    pub fn convex_hull(points: Vec<Vec3>) -> Self {
        debug_assert!(!points.is_empty(), "a hull needs at least one point");
        Self::ConvexHull { points }
    }

    /// The shape's minimum enclosing world-space AABB under a transform
    ///
    /// Spheres ignore scale (the radius is already a world-space quantity,
    /// matching how spawning code sizes them); boxes are axis-aligned by
    /// definition, so rotation is ignored and scale stretches the extents.
    /// Hulls rotate their support points and take the min/max per axis -
    /// recomputed on every query rather than cached, so a transform change
    /// can never serve stale bounds.
    pub fn world_bounds(&self, transform: &Transform) -> Aabb {
        match self {
            Self::Sphere { radius } => Aabb::from_center_extents(
                transform.position,
                Vec3::new(*radius, *radius, *radius),
            ),
            Self::Box { half_extents } => Aabb::from_center_extents(
                transform.position,
                half_extents.component_mul(&transform.scale),
            ),
            Self::ConvexHull { points } => {
                let mut bounds = Aabb::new(
                    transform.transform_point(points[0]),
                    transform.transform_point(points[0]),
                );
                for &point in &points[1..] {
                    bounds.expand_to(transform.transform_point(point));
                }
                bounds
            }
        }
    }
}
