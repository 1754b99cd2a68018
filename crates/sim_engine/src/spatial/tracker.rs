//! Incremental occupancy tracking
//!
//! Rebuilding the octree every tick would cost O(objects x tree size). The
//! tracker instead keeps, per object, a log of which cells it currently
//! touches and how (partial or full). Each tick only those logged cells are
//! re-examined, so maintenance cost is proportional to the number of cells
//! an object actually occupies - typically one.

use std::collections::HashMap;

use crate::scene::Aabb;
use crate::spatial::classify::{classify, Containment};
use crate::spatial::octree::{CellId, Octree};
use crate::world::ObjectId;

/// One entry in an object's occupancy log
///
/// Invariant: a log holds exactly one entry per cell the object has a
/// nonzero relationship with. Disjoint relationships are pruned, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStatus {
    /// Non-owning reference to the occupied cell
    pub cell: CellId,
    /// Classification recorded at the last refresh
    pub containment: Containment,
}

/// Per-object occupancy logs driving cheap per-tick tree updates
#[derive(Debug, Default)]
pub struct OccupancyTracker {
    logs: HashMap<ObjectId, Vec<CellStatus>>,
}

impl OccupancyTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            logs: HashMap::new(),
        }
    }

    /// Insert an object into the tree and start tracking it
    ///
    /// Tracking an object twice without an intervening [`Self::remove`] is a
    /// caller error.
    pub fn insert(&mut self, tree: &mut Octree, object: ObjectId, bounds: &Aabb) {
        debug_assert!(
            !self.logs.contains_key(&object),
            "object {object:?} is already tracked"
        );
        let log = to_log(tree.insert(object, bounds));
        self.logs.insert(object, log);
    }

    /// Stop tracking an object and strip it from the tree
    ///
    /// Removing an object that was never inserted is a caller error; it
    /// fails an assertion in debug builds and is a warned no-op otherwise.
    pub fn remove(&mut self, tree: &mut Octree, object: ObjectId) {
        if let Some(log) = self.logs.remove(&object) {
            for status in log {
                // The logged cell may have subdivided since the last refresh,
                // migrating this occupant into its children; purge the whole
                // subtree, not just the stale cell.
                tree.remove_below(status.cell, object);
            }
        } else {
            debug_assert!(false, "removed object {object:?} was never tracked");
            log::warn!("ignoring removal of untracked object {object:?}");
        }
    }

    /// Whether an object is currently tracked
    pub fn is_tracked(&self, object: ObjectId) -> bool {
        self.logs.contains_key(&object)
    }

    /// Number of tracked objects
    pub fn tracked_count(&self) -> usize {
        self.logs.len()
    }

    /// The occupancy log of a tracked object
    ///
    /// Empty when the object is currently outside the tree bounds.
    pub fn log(&self, object: ObjectId) -> Option<&[CellStatus]> {
        self.logs.get(&object).map(Vec::as_slice)
    }

    /// Re-evaluate one object's logged cells against its current bounds
    ///
    /// The cheap common case - still fully inside a leaf it was logged in -
    /// only refreshes the occupant's cached bounds. Otherwise the entry is
    /// repaired: re-homed below a cell that has subdivided, relocated via
    /// the upward ancestor walk when the object left the cell, or re-derived
    /// through the same walk while the object straddles cell boundaries,
    /// which is what picks up newly touched sibling cells.
    pub fn refresh(&mut self, tree: &mut Octree, object: ObjectId, bounds: &Aabb) {
        let Some(slot) = self.logs.get_mut(&object) else {
            debug_assert!(false, "refreshed object {object:?} was never tracked");
            return;
        };
        let old = std::mem::take(slot);

        let mut fresh: Vec<CellStatus> = Vec::with_capacity(old.len().max(1));

        if old.is_empty() {
            // The object re-entered (or just entered) the indexed volume:
            // fall back to a full top-down insertion.
            if classify(bounds, &tree.cell(tree.root()).bounds()) != Containment::Disjoint {
                merge_all(&mut fresh, tree.insert(object, bounds));
            }
        } else {
            for status in old {
                let cell = status.cell;

                if !tree.cell(cell).is_leaf() {
                    // The cell subdivided since it was logged. Migration
                    // placed the object into children by its cached bounds,
                    // which may predate this move, so the subtree is purged
                    // and the stale entry replaced by fresh placements.
                    tree.remove_below(cell, object);
                    merge_all(&mut fresh, tree.insert_from(cell, object, bounds));
                    if classify(bounds, &tree.cell(cell).bounds()) != Containment::Full {
                        // Not confined to the subtree; the ancestor walk
                        // covers whatever lies outside it.
                        merge_all(&mut fresh, tree.search_upward(cell, object, bounds));
                    }
                    continue;
                }

                match classify(bounds, &tree.cell(cell).bounds()) {
                    Containment::Disjoint => {
                        // Left this cell: drop the occupant reference and
                        // find the new home without rescanning from the root.
                        tree.remove_from(cell, object);
                        merge_all(&mut fresh, tree.search_upward(cell, object, bounds));
                    }
                    Containment::Full => {
                        // Fully enclosed: this is the only leaf touching the
                        // object, so a bounds refresh suffices.
                        tree.refresh_occupant(cell, object, bounds);
                        merge(&mut fresh, cell, Containment::Full);
                    }
                    Containment::Partial => {
                        // Straddling: the object may have started touching
                        // cells no log entry knows about, so its placements
                        // are re-derived through the ancestor walk. Stale
                        // sibling entries prune themselves when their own
                        // entry reclassifies as disjoint.
                        tree.refresh_occupant(cell, object, bounds);
                        merge(&mut fresh, cell, Containment::Partial);
                        merge_all(&mut fresh, tree.search_upward(cell, object, bounds));
                    }
                }
            }
        }

        if let Some(slot) = self.logs.get_mut(&object) {
            *slot = fresh;
        }
    }

    /// Run [`Self::refresh`] over a batch of objects in iteration order
    pub fn refresh_all(
        &mut self,
        tree: &mut Octree,
        objects: impl IntoIterator<Item = (ObjectId, Aabb)>,
    ) {
        for (object, bounds) in objects {
            self.refresh(tree, object, &bounds);
        }
    }
}

fn to_log(placements: Vec<(CellId, Containment)>) -> Vec<CellStatus> {
    placements
        .into_iter()
        .map(|(cell, containment)| CellStatus { cell, containment })
        .collect()
}

/// Merge a placement into a log, never duplicating a cell
fn merge(log: &mut Vec<CellStatus>, cell: CellId, containment: Containment) {
    if let Some(existing) = log.iter_mut().find(|s| s.cell == cell) {
        existing.containment = containment;
    } else {
        log.push(CellStatus { cell, containment });
    }
}

fn merge_all(log: &mut Vec<CellStatus>, placements: Vec<(CellId, Containment)>) {
    for (cell, containment) in placements {
        merge(log, cell, containment);
    }
}
