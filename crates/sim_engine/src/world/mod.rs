//! Object registry and simulation loop
//!
//! The world owns every game object plus the spatial index, occupancy
//! tracker, and collision pipeline that operate on them, and drives the
//! per-tick update: integrate bodies, refresh the index incrementally,
//! detect contacts, resolve them.

mod object;

pub use object::{GameObject, ObjectId};

use std::collections::HashSet;

use crate::config::SimConfig;
use crate::foundation::collections::HandleMap;
use crate::foundation::math::Vec3;
use crate::foundation::time::FixedStep;
use crate::physics::{resolve_contact, CollisionPair, CollisionPipeline, Contact};
use crate::scene::Aabb;
use crate::spatial::{OccupancyTracker, Octree};

/// The simulation world
pub struct World {
    objects: HandleMap<ObjectId, GameObject>,
    octree: Octree,
    tracker: OccupancyTracker,
    pipeline: CollisionPipeline,
    contacts: Vec<(CollisionPair, Contact)>,
    stepper: FixedStep,
    gravity: Vec3,
}

impl World {
    /// Create an empty world from a configuration
    pub fn new(config: SimConfig) -> Self {
        Self {
            objects: HandleMap::with_key(),
            octree: Octree::new(config.world_bounds(), config.octree_config()),
            tracker: OccupancyTracker::new(),
            pipeline: CollisionPipeline::new(),
            contacts: Vec::new(),
            stepper: FixedStep::new(config.physics.timestep),
            gravity: config.gravity(),
        }
    }

    /// Add an object to the world, returning its handle
    ///
    /// Objects with a collider enter the spatial index immediately, so they
    /// must start inside the world volume.
    pub fn spawn(&mut self, object: GameObject) -> ObjectId {
        let bounds = object
            .collider
            .as_ref()
            .map(|shape| shape.world_bounds(&object.transform));
        let id = self.objects.insert(object);
        if let Some(bounds) = bounds {
            self.tracker.insert(&mut self.octree, id, &bounds);
        }
        id
    }

    /// Remove an object, returning it if the handle was live
    pub fn despawn(&mut self, id: ObjectId) -> Option<GameObject> {
        let object = self.objects.remove(id)?;
        if object.collider.is_some() {
            self.tracker.remove(&mut self.octree, id);
        }
        Some(object)
    }

    /// Borrow an object
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Mutably borrow an object
    ///
    /// Transform and body edits take effect at the next [`Self::step`]; the
    /// spatial index catches up during that tick's refresh.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// Iterate over all live objects
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        self.objects.iter()
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The spatial index
    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    /// The occupancy tracker
    pub fn tracker(&self) -> &OccupancyTracker {
        &self.tracker
    }

    /// Contacts produced by the most recent tick
    pub fn contacts(&self) -> &[(CollisionPair, Contact)] {
        &self.contacts
    }

    /// Pairs that started colliding in the most recent tick
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.pipeline.entered()
    }

    /// Pairs that stopped colliding in the most recent tick
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.pipeline.exited()
    }

    /// Pairs colliding as of the most recent tick
    pub fn active_collisions(&self) -> &HashSet<CollisionPair> {
        self.pipeline.current()
    }

    /// Feed wall-clock frame time into the fixed-step accumulator
    ///
    /// Runs as many fixed ticks as the accumulated time covers and returns
    /// how many ran; the remainder carries into the next frame.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.stepper.accumulate(frame_time);
        let mut ticks = 0;
        while let Some(dt) = self.stepper.drain() {
            self.step(dt);
            ticks += 1;
        }
        ticks
    }

    /// Advance the simulation by one tick
    ///
    /// Tick order: integrate rigid bodies, refresh the spatial index from
    /// the moved bounds, detect contacts, resolve them with impulses. Index
    /// refresh is incremental: only each object's logged cells are
    /// re-examined, not the whole tree.
    pub fn step(&mut self, dt: f32) {
        for (_, object) in &mut self.objects {
            if let Some(body) = &mut object.body {
                body.integrate(&mut object.transform, self.gravity, dt);
            }
        }

        let moved: Vec<(ObjectId, Aabb)> = self
            .objects
            .iter()
            .filter_map(|(id, object)| {
                object
                    .collider
                    .as_ref()
                    .map(|shape| (id, shape.world_bounds(&object.transform)))
            })
            .collect();
        self.tracker.refresh_all(&mut self.octree, moved);

        let Self {
            objects,
            octree,
            pipeline,
            contacts,
            ..
        } = self;
        let registry: &HandleMap<ObjectId, GameObject> = objects;
        *contacts = pipeline.detect(octree, move |id| {
            registry.get(id).and_then(|object| {
                object
                    .collider
                    .as_ref()
                    .map(|shape| (shape, &object.transform))
            })
        });

        for (pair, contact) in &self.contacts {
            if let Some([a, b]) = self.objects.get_disjoint_mut([pair.first, pair.second]) {
                resolve_contact(
                    contact,
                    &mut a.transform,
                    a.body.as_mut(),
                    &mut b.transform,
                    b.body.as_mut(),
                );
            }
        }
    }
}
