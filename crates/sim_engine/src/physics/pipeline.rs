//! Collision pipeline: broad phase, narrow phase, impulse response
//!
//! The broad phase reads same-leaf occupant groupings straight out of the
//! octree - an object straddling a cell boundary is listed in every leaf it
//! touches, so boundary-crossing pairs are never missed. The narrow phase
//! refines candidates into contacts, and frame-over-frame pair sets expose
//! enter/exit events.

use std::collections::HashSet;

use crate::foundation::math::{Transform, Vec3};
use crate::physics::contact::{test_contact, Contact};
use crate::physics::rigid_body::RigidBody;
use crate::physics::shape::CollisionShape;
use crate::spatial::Octree;
use crate::world::ObjectId;

/// Fraction of remaining penetration corrected per tick
const CORRECTION_PERCENT: f32 = 0.8;

/// Penetration slack left uncorrected to avoid resting-contact jitter
const CORRECTION_SLOP: f32 = 0.01;

/// Collision pair representing two objects that are colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// The lesser object id of the pair
    pub first: ObjectId,
    /// The greater object id of the pair
    pub second: ObjectId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller id first so a
    /// pair hashes identically regardless of discovery order)
    pub fn new(a: ObjectId, b: ObjectId) -> Self {
        if a < b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }
}

/// Broad- and narrow-phase collision detection with pair-event tracking
#[derive(Debug, Default)]
pub struct CollisionPipeline {
    /// Collision pairs from the current frame
    current_pairs: HashSet<CollisionPair>,

    /// Collision pairs from the previous frame
    previous_pairs: HashSet<CollisionPair>,
}

impl CollisionPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Broad phase: candidate pairs from same-leaf occupancy
    ///
    /// Deduplicated (a straddling pair can share several leaves) and sorted
    /// so narrow phase and resolution run in a deterministic order.
    pub fn broad_phase(&self, octree: &Octree) -> Vec<CollisionPair> {
        let mut candidates = HashSet::new();
        for leaf in octree.occupied_leaves() {
            for (a, b) in octree.candidate_pairs_in_cell(leaf) {
                candidates.insert(CollisionPair::new(a, b));
            }
        }
        let mut ordered: Vec<_> = candidates.into_iter().collect();
        ordered.sort_unstable_by_key(|pair| (pair.first, pair.second));
        ordered
    }

    /// Run broad and narrow phase, returning this frame's contacts
    ///
    /// `lookup` resolves an object id to its shape and transform; candidates
    /// whose objects have despawned or lost their collider are skipped.
    pub fn detect<'a, F>(&mut self, octree: &Octree, lookup: F) -> Vec<(CollisionPair, Contact)>
    where
        F: Fn(ObjectId) -> Option<(&'a CollisionShape, &'a Transform)>,
    {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let mut contacts = Vec::new();
        for pair in self.broad_phase(octree) {
            let Some((shape_a, transform_a)) = lookup(pair.first) else {
                continue;
            };
            let Some((shape_b, transform_b)) = lookup(pair.second) else {
                continue;
            };

            if let Some(contact) = test_contact(shape_a, transform_a, shape_b, transform_b) {
                self.current_pairs.insert(pair);
                contacts.push((pair, contact));
            }
        }
        contacts
    }

    /// Pairs that started colliding this frame
    pub fn entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped colliding this frame
    pub fn exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// All pairs colliding this frame
    pub fn current(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Forget all pair history
    pub fn clear(&mut self) {
        self.current_pairs.clear();
        self.previous_pairs.clear();
    }
}

/// Resolve one contact with an impulse along the contact normal
///
/// The normal points from the first body toward the second. Restitution
/// takes the softer of the two coefficients; positional correction bleeds
/// off most of the remaining penetration, split by inverse mass. A pair of
/// immovable bodies is left untouched.
pub fn resolve_contact(
    contact: &Contact,
    transform_a: &mut Transform,
    body_a: Option<&mut RigidBody>,
    transform_b: &mut Transform,
    body_b: Option<&mut RigidBody>,
) {
    let inv_a = body_a.as_ref().map_or(0.0, |b| b.inverse_mass);
    let inv_b = body_b.as_ref().map_or(0.0, |b| b.inverse_mass);
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let velocity_a = body_a.as_ref().map_or_else(Vec3::zeros, |b| b.velocity);
    let velocity_b = body_b.as_ref().map_or_else(Vec3::zeros, |b| b.velocity);
    let approach = (velocity_b - velocity_a).dot(&contact.normal);

    let mut body_a = body_a;
    let mut body_b = body_b;

    // Only push apart bodies still approaching; separating pairs keep the
    // velocity the previous impulse gave them.
    if approach < 0.0 {
        let restitution = f32::min(
            body_a.as_ref().map_or(1.0, |b| b.restitution),
            body_b.as_ref().map_or(1.0, |b| b.restitution),
        );
        let magnitude = -(1.0 + restitution) * approach / inv_sum;
        let impulse = contact.normal * magnitude;

        if let Some(body) = body_a.as_deref_mut() {
            body.velocity -= impulse * inv_a;
        }
        if let Some(body) = body_b.as_deref_mut() {
            body.velocity += impulse * inv_b;
        }
    }

    let depth = (contact.penetration - CORRECTION_SLOP).max(0.0);
    let correction = contact.normal * (depth / inv_sum * CORRECTION_PERCENT);
    transform_a.position -= correction * inv_a;
    transform_b.position += correction * inv_b;
}
