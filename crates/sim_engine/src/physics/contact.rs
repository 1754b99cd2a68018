//! Narrow-phase contact generation
//!
//! Candidate pairs from the broad phase are refined into contacts here.
//! Sphere pairs are tested exactly; boxes use their axis-aligned extents,
//! and convex hulls are tested by their minimum enclosing AABB. The contact
//! normal always points from the first shape toward the second.

use crate::foundation::math::{Transform, Vec3};
use crate::physics::shape::CollisionShape;
use crate::scene::Aabb;

/// A single contact between two intersecting shapes
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec3,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Test two transformed shapes for intersection
///
/// Returns `None` when the shapes are separated; touching shapes produce a
/// zero-penetration contact so resting contact is not lost to float noise.
pub fn test_contact(
    shape_a: &CollisionShape,
    transform_a: &Transform,
    shape_b: &CollisionShape,
    transform_b: &Transform,
) -> Option<Contact> {
    match (shape_a, shape_b) {
        (CollisionShape::Sphere { radius: ra }, CollisionShape::Sphere { radius: rb }) => {
            sphere_vs_sphere(transform_a.position, *ra, transform_b.position, *rb)
        }
        (CollisionShape::Sphere { radius }, _) => {
            let bounds = shape_b.world_bounds(transform_b);
            sphere_vs_aabb(transform_a.position, *radius, &bounds)
        }
        (_, CollisionShape::Sphere { radius }) => {
            let bounds = shape_a.world_bounds(transform_a);
            sphere_vs_aabb(transform_b.position, *radius, &bounds).map(Contact::flipped)
        }
        _ => aabb_vs_aabb(
            &shape_a.world_bounds(transform_a),
            &shape_b.world_bounds(transform_b),
        ),
    }
}

impl Contact {
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            penetration: self.penetration,
        }
    }
}

fn sphere_vs_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<Contact> {
    let offset = center_b - center_a;
    let distance_sq = offset.magnitude_squared();
    let radius_sum = radius_a + radius_b;
    if distance_sq > radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    // Coincident centers have no meaningful direction; push along +x
    let normal = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec3::x()
    };
    Some(Contact {
        normal,
        penetration: radius_sum - distance,
    })
}

/// Sphere against an axis-aligned box; the returned normal points from the
/// sphere toward the box
fn sphere_vs_aabb(center: Vec3, radius: f32, bounds: &Aabb) -> Option<Contact> {
    let closest = Vec3::new(
        center.x.clamp(bounds.min.x, bounds.max.x),
        center.y.clamp(bounds.min.y, bounds.max.y),
        center.z.clamp(bounds.min.z, bounds.max.z),
    );
    let offset = center - closest;
    let distance_sq = offset.magnitude_squared();
    if distance_sq > radius * radius {
        return None;
    }

    if distance_sq > f32::EPSILON {
        // Center outside the box: push the sphere out along the face offset
        let distance = distance_sq.sqrt();
        Some(Contact {
            normal: -(offset / distance),
            penetration: radius - distance,
        })
    } else {
        // Center inside the box: exit through the nearest face
        let sphere_box = Aabb::from_center_extents(center, Vec3::new(radius, radius, radius));
        aabb_vs_aabb(&sphere_box, bounds)
    }
}

/// Axis-separation test over the three coordinate axes
///
/// The axis with the smallest overlap is the contact axis; its sign is
/// chosen so the normal points from `a` toward `b`.
fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    let center_delta = b.center() - a.center();
    let overlap = a.extents() + b.extents()
        - Vec3::new(
            center_delta.x.abs(),
            center_delta.y.abs(),
            center_delta.z.abs(),
        );
    if overlap.x < 0.0 || overlap.y < 0.0 || overlap.z < 0.0 {
        return None;
    }

    let (penetration, axis) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (overlap.x, Vec3::x())
    } else if overlap.y <= overlap.z {
        (overlap.y, Vec3::y())
    } else {
        (overlap.z, Vec3::z())
    };

    let sign = if axis.dot(&center_delta) >= 0.0 { 1.0 } else { -1.0 };
    Some(Contact {
        normal: axis * sign,
        penetration,
    })
}
