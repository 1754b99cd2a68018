//! Long-running consistency checks for the incrementally maintained index
//!
//! Objects jitter around the volume for many ticks while three invariants
//! are re-checked every round: tracking logs mirror the tree's occupant
//! lists exactly, every listed cell really overlaps its occupant, and every
//! truly intersecting pair shows up among the broad-phase candidates (also
//! true of a from-scratch rebuild, which may partition differently).

use std::collections::HashSet;

use sim_engine::prelude::*;
use sim_engine::spatial::classify;

/// Deterministic xorshift so failures reproduce
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn unit(&mut self) -> f32 {
        (self.next() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }
}

fn mint_ids(n: usize) -> Vec<ObjectId> {
    let mut slots: sim_engine::foundation::collections::HandleMap<ObjectId, ()> =
        sim_engine::foundation::collections::HandleMap::with_key();
    (0..n).map(|_| slots.insert(())).collect()
}

fn world_bounds() -> Aabb {
    Aabb::from_center_extents(Vec3::zeros(), Vec3::new(50.0, 50.0, 50.0))
}

fn random_bounds(rng: &mut Rng) -> Aabb {
    let center = Vec3::new(
        rng.range(-45.0, 45.0),
        rng.range(-45.0, 45.0),
        rng.range(-45.0, 45.0),
    );
    let extent = rng.range(0.2, 4.0);
    Aabb::from_center_extents(center, Vec3::new(extent, extent, extent))
}

fn all_leaves(tree: &Octree) -> Vec<CellId> {
    let mut leaves = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(cell) = stack.pop() {
        match tree.cell(cell).children() {
            Some(children) => stack.extend(children),
            None => leaves.push(cell),
        }
    }
    leaves
}

/// Tracking logs and the tree's occupant lists must describe the same
/// placements, with classifications that match a fresh evaluation, and every
/// leaf an object overlaps must list it (what a from-scratch rebuild of the
/// same cell structure would produce)
fn assert_index_consistent(tree: &Octree, tracker: &OccupancyTracker, objects: &[(ObjectId, Aabb)]) {
    let leaves = all_leaves(tree);
    let mut logged_entries = 0;
    for &(id, bounds) in objects {
        let log = tracker.log(id).unwrap_or_else(|| panic!("{id:?} untracked"));
        logged_entries += log.len();

        let mut logged_cells = HashSet::new();
        for status in log {
            assert!(
                logged_cells.insert(status.cell),
                "{id:?} logs a duplicate cell"
            );
            assert!(
                tree.cell(status.cell).is_leaf(),
                "{id:?} logs an internal cell"
            );
            assert!(
                tree.cell_contains(status.cell, id),
                "{id:?} logged in a cell that does not list it"
            );
            let current = classify(&bounds, &tree.cell(status.cell).bounds());
            assert_ne!(current, Containment::Disjoint, "{id:?} logs a disjoint cell");
            assert_eq!(
                status.containment, current,
                "{id:?} logs a stale classification"
            );
        }

        let mut listed = 0;
        for &leaf in &leaves {
            let overlaps = classify(&bounds, &tree.cell(leaf).bounds()) != Containment::Disjoint;
            let contained = tree.cell_contains(leaf, id);
            assert_eq!(
                overlaps, contained,
                "{id:?} listing in {leaf:?} disagrees with its bounds"
            );
            listed += usize::from(contained);
        }
        assert_eq!(
            listed,
            logged_cells.len(),
            "{id:?} has tree listings its log does not know about"
        );
    }

    assert_eq!(
        tree.occupant_entries(),
        logged_entries,
        "tree holds entries no log accounts for"
    );
}

fn candidate_set(tree: &Octree) -> HashSet<CollisionPair> {
    let mut pairs = HashSet::new();
    for leaf in tree.occupied_leaves() {
        for (a, b) in tree.candidate_pairs_in_cell(leaf) {
            pairs.insert(CollisionPair::new(a, b));
        }
    }
    pairs
}

/// Every pair whose bounds intersect must appear among the candidates
fn assert_no_missed_pairs(tree: &Octree, objects: &[(ObjectId, Aabb)]) {
    let candidates = candidate_set(tree);
    for (i, &(a, ref ab)) in objects.iter().enumerate() {
        for &(b, ref bb) in &objects[i + 1..] {
            if ab.intersects(bb) {
                assert!(
                    candidates.contains(&CollisionPair::new(a, b)),
                    "intersecting pair {a:?}/{b:?} missing from candidates"
                );
            }
        }
    }
}

#[test]
fn jittering_objects_keep_index_and_logs_in_sync() {
    let mut rng = Rng(0x5eed_cafe);
    let config = OctreeConfig {
        max_occupancy: 3,
        max_depth: 4,
    };
    let mut tree = Octree::new(world_bounds(), config);
    let mut tracker = OccupancyTracker::new();

    let ids = mint_ids(24);
    let mut objects: Vec<(ObjectId, Aabb)> = ids
        .iter()
        .map(|&id| (id, random_bounds(&mut rng)))
        .collect();
    for &(id, bounds) in &objects {
        tracker.insert(&mut tree, id, &bounds);
    }

    for _round in 0..60 {
        // Jitter a random third of the objects; big warps now and then
        for entry in &mut objects {
            match rng.next() % 6 {
                0 | 1 => {
                    let delta = Vec3::new(
                        rng.range(-3.0, 3.0),
                        rng.range(-3.0, 3.0),
                        rng.range(-3.0, 3.0),
                    );
                    let center = entry.1.center() + delta;
                    let clamped = Vec3::new(
                        center.x.clamp(-45.0, 45.0),
                        center.y.clamp(-45.0, 45.0),
                        center.z.clamp(-45.0, 45.0),
                    );
                    entry.1 = Aabb::from_center_extents(clamped, entry.1.extents());
                }
                2 => entry.1 = random_bounds(&mut rng),
                _ => {}
            }
        }

        tracker.refresh_all(&mut tree, objects.iter().copied());

        // Even right after the pass - when a log can still point at a cell
        // that a later refresh subdivided under it - the tree's occupant
        // lists must not miss a single intersecting pair.
        assert_no_missed_pairs(&tree, &objects);

        // Stale entries repair themselves on their owner's next refresh, and
        // that repair can itself subdivide; iterate to quiescence before
        // auditing exact log/tree agreement.
        loop {
            let cells_before = tree.cell_count();
            tracker.refresh_all(&mut tree, objects.iter().copied());
            if tree.cell_count() == cells_before {
                break;
            }
        }
        assert_index_consistent(&tree, &tracker, &objects);
        assert_no_missed_pairs(&tree, &objects);

        // A from-scratch rebuild partitions differently but must be just as
        // complete about truly intersecting pairs.
        let mut rebuilt = Octree::new(
            world_bounds(),
            OctreeConfig {
                max_occupancy: 3,
                max_depth: 4,
            },
        );
        for &(id, bounds) in &objects {
            rebuilt.insert(id, &bounds);
        }
        assert_no_missed_pairs(&rebuilt, &objects);
    }
}

#[test]
fn objects_wandering_out_and_back_stay_tracked() {
    let mut rng = Rng(0xfeed_beef);
    let mut tree = Octree::new(world_bounds(), OctreeConfig::default());
    let mut tracker = OccupancyTracker::new();

    let ids = mint_ids(6);
    let mut objects: Vec<(ObjectId, Aabb)> = ids
        .iter()
        .map(|&id| (id, random_bounds(&mut rng)))
        .collect();
    for &(id, bounds) in &objects {
        tracker.insert(&mut tree, id, &bounds);
    }

    for round in 0..40 {
        for (slot, entry) in objects.iter_mut().enumerate() {
            // Each object takes turns far outside the indexed volume
            entry.1 = if (round + slot) % 4 == 0 {
                Aabb::from_center_extents(Vec3::new(500.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0))
            } else {
                random_bounds(&mut rng)
            };
        }
        tracker.refresh_all(&mut tree, objects.iter().copied());

        for &(id, bounds) in &objects {
            let log = tracker.log(id).unwrap_or_else(|| panic!("{id:?} untracked"));
            if bounds.intersects(&world_bounds()) {
                assert!(!log.is_empty(), "{id:?} inside the volume but unplaced");
            } else {
                assert!(log.is_empty(), "{id:?} outside the volume but still placed");
            }
        }
    }
}
