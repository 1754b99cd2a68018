//! Octree spatial partitioning structure
//!
//! Divides 3D space into hierarchical axis-aligned cells for broad-phase
//! collision candidate generation. Cells subdivide lazily into 8 octants
//! when occupancy exceeds a soft cap; the depth cap always wins over
//! occupancy pressure, so cells at maximum depth accept occupants without
//! bound.
//!
//! Cells live in an arena indexed by [`CellId`]: children are owned by the
//! arena, parent links are plain non-owning ids. This keeps the upward
//! relocation walk cheap without any reference counting.

use crate::foundation::math::Vec3;
use crate::scene::Aabb;
use crate::spatial::classify::{classify, Containment};
use crate::world::ObjectId;

/// Configuration for octree behavior
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Soft cap on occupants per leaf before subdivision
    ///
    /// Exceeded without bound once a leaf reaches `max_depth`.
    pub max_occupancy: usize,

    /// Maximum subdivision depth (root is depth 0)
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_occupancy: 3,
            max_depth: 4,
        }
    }
}

/// Index of a cell in the octree arena
///
/// Stable for the lifetime of the tree: cells are only added, never removed,
/// until the whole tree is cleared or dropped. Safe to hold in tracking logs
/// as a non-owning back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(u32);

impl CellId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An occupant reference stored in a leaf cell
///
/// The cached bounds are the occupant's world extent as of its last
/// classification; subdivision uses them to migrate occupants into the
/// correct children without consulting the object registry.
#[derive(Debug, Clone, Copy)]
struct Occupant {
    id: ObjectId,
    bounds: Aabb,
}

/// Single cell in the octree hierarchy
#[derive(Debug, Clone)]
pub struct SpatialCell {
    bounds: Aabb,
    depth: u32,
    parent: Option<CellId>,
    children: Option<[CellId; 8]>,
    occupants: Vec<Occupant>,
}

impl SpatialCell {
    fn new(bounds: Aabb, depth: u32, parent: Option<CellId>, capacity: usize) -> Self {
        Self {
            bounds,
            depth,
            parent,
            children: None,
            occupants: Vec::with_capacity(capacity),
        }
    }

    /// World-space bounds of this cell
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Depth from the root (root is 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent cell, `None` for the root
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// The 8 children, `None` while this cell is a leaf
    pub fn children(&self) -> Option<[CellId; 8]> {
        self.children
    }

    /// Check if this cell is a leaf (holds occupants directly)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of occupant references held directly by this cell
    ///
    /// Always 0 for internal cells.
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }
}

/// Octree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Octree {
    /// Arena of cells; the root is always at index 0
    cells: Vec<SpatialCell>,

    /// Configuration
    config: OctreeConfig,
}

impl Octree {
    /// Create a new octree with a single leaf root spanning `bounds`
    pub fn new(bounds: Aabb, config: OctreeConfig) -> Self {
        let root = SpatialCell::new(bounds, 0, None, config.max_occupancy);
        Self {
            cells: vec![root],
            config,
        }
    }

    /// The root cell id
    pub fn root(&self) -> CellId {
        CellId(0)
    }

    /// Access a cell by id
    pub fn cell(&self, id: CellId) -> &SpatialCell {
        &self.cells[id.index()]
    }

    /// The tree's configuration
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Total number of cells in the arena (internal and leaf)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Insert an object with the given world extent, starting at the root
    ///
    /// Returns every (cell, classification) placement produced; a straddling
    /// object is placed in every leaf it touches. Inserting an object
    /// disjoint from the tree bounds is a caller error: it fails an
    /// assertion in debug builds and is skipped with a warning otherwise.
    pub fn insert(&mut self, object: ObjectId, bounds: &Aabb) -> Vec<(CellId, Containment)> {
        let mut placements = Vec::new();
        let root_class = classify(bounds, &self.cells[0].bounds);
        if root_class == Containment::Disjoint {
            debug_assert!(
                false,
                "inserted object {object:?} is disjoint from the tree bounds"
            );
            log::warn!("object {object:?} lies outside the tree bounds; not inserted");
            return placements;
        }
        self.insert_at(self.root(), object, bounds, &mut placements);
        placements
    }

    /// Insert starting from a given cell instead of the root
    ///
    /// Used by the occupancy tracker to re-home an object below a cell that
    /// subdivided since it was logged. Cells the object does not touch are
    /// skipped, so calling this with a disjoint extent is a harmless no-op.
    pub fn insert_from(
        &mut self,
        cell: CellId,
        object: ObjectId,
        bounds: &Aabb,
    ) -> Vec<(CellId, Containment)> {
        let mut placements = Vec::new();
        self.insert_at(cell, object, bounds, &mut placements);
        placements
    }

    fn insert_at(
        &mut self,
        cell: CellId,
        object: ObjectId,
        bounds: &Aabb,
        placements: &mut Vec<(CellId, Containment)>,
    ) {
        let class = classify(bounds, &self.cells[cell.index()].bounds);
        if class == Containment::Disjoint {
            return;
        }

        if let Some(children) = self.cells[cell.index()].children {
            for child in children {
                self.insert_at(child, object, bounds, placements);
            }
            return;
        }

        // Leaf: idempotent append. Re-inserting an object that is already
        // listed refreshes its cached bounds instead of duplicating it.
        let node = &mut self.cells[cell.index()];
        let already_present = if let Some(occ) = node.occupants.iter_mut().find(|o| o.id == object)
        {
            occ.bounds = *bounds;
            true
        } else {
            node.occupants.push(Occupant {
                id: object,
                bounds: *bounds,
            });
            false
        };

        let over_cap = node.occupants.len() > self.config.max_occupancy;
        let below_depth_cap = node.depth < self.config.max_depth;

        if !already_present && over_cap && below_depth_cap {
            // A new arrival pushed the leaf over its soft cap: subdivide,
            // migrating every occupant (newcomer included) into whichever
            // children they overlap, then record the newcomer's placements
            // by retrying at this level.
            self.subdivide(cell);
            if let Some(children) = self.cells[cell.index()].children {
                for child in children {
                    self.insert_at(child, object, bounds, placements);
                }
            }
        } else {
            // At the depth cap the soft limit is ignored entirely.
            placements.push((cell, class));
        }
    }

    /// Split a leaf into 8 octants and migrate its occupants down
    ///
    /// Octants partition the volume at the axis midpoints in a fixed order
    /// (bit 0 = +x half, bit 1 = +y half, bit 2 = +z half). An occupant
    /// overlapping several octants is placed in every one it touches. After
    /// migration the parent holds no direct occupants.
    fn subdivide(&mut self, cell: CellId) {
        debug_assert!(self.cells[cell.index()].is_leaf(), "cell already subdivided");

        let bounds = self.cells[cell.index()].bounds;
        let depth = self.cells[cell.index()].depth;
        let center = bounds.center();
        let quarter = bounds.extents() * 0.5;

        let mut child_ids = [CellId(0); 8];
        for (octant, slot) in child_ids.iter_mut().enumerate() {
            let x_sign = if octant & 1 == 0 { -1.0 } else { 1.0 };
            let y_sign = if octant & 2 == 0 { -1.0 } else { 1.0 };
            let z_sign = if octant & 4 == 0 { -1.0 } else { 1.0 };

            let child_center = Vec3::new(
                center.x + quarter.x * x_sign,
                center.y + quarter.y * y_sign,
                center.z + quarter.z * z_sign,
            );
            let child_bounds = Aabb::from_center_extents(child_center, quarter);

            let id = CellId(self.cells.len() as u32);
            self.cells.push(SpatialCell::new(
                child_bounds,
                depth + 1,
                Some(cell),
                self.config.max_occupancy,
            ));
            *slot = id;
        }

        self.cells[cell.index()].children = Some(child_ids);

        let migrating = std::mem::take(&mut self.cells[cell.index()].occupants);
        for occ in migrating {
            for child in child_ids {
                if classify(&occ.bounds, &self.cells[child.index()].bounds)
                    != Containment::Disjoint
                {
                    self.cells[child.index()].occupants.push(occ);
                }
            }
        }
    }

    /// Remove an object's occupant reference from one cell
    ///
    /// Returns whether the object was listed there.
    pub fn remove_from(&mut self, cell: CellId, object: ObjectId) -> bool {
        let occupants = &mut self.cells[cell.index()].occupants;
        let before = occupants.len();
        occupants.retain(|o| o.id != object);
        occupants.len() != before
    }

    /// Strip an object from every cell in one cell's subtree
    ///
    /// Used when a logged cell has subdivided: migration placed the object
    /// into children by its cached bounds, which may be stale by the time
    /// its own refresh runs, so the subtree is purged before re-inserting.
    /// Returns the number of occupant references removed.
    pub fn remove_below(&mut self, cell: CellId, object: ObjectId) -> usize {
        let mut removed = 0;
        let mut stack = vec![cell];
        while let Some(node) = stack.pop() {
            if let Some(children) = self.cells[node.index()].children {
                stack.extend(children);
            }
            let occupants = &mut self.cells[node.index()].occupants;
            let before = occupants.len();
            occupants.retain(|o| o.id != object);
            removed += before - occupants.len();
        }
        removed
    }

    /// Strip an object from every leaf that lists it
    ///
    /// The slow path used when no tracking log is available; returns the
    /// number of occupant references removed.
    pub fn remove(&mut self, object: ObjectId) -> usize {
        let mut removed = 0;
        for node in &mut self.cells {
            let before = node.occupants.len();
            node.occupants.retain(|o| o.id != object);
            removed += before - node.occupants.len();
        }
        removed
    }

    /// Refresh the cached bounds of an object already listed in a cell
    pub fn refresh_occupant(&mut self, cell: CellId, object: ObjectId, bounds: &Aabb) {
        if let Some(occ) = self.cells[cell.index()]
            .occupants
            .iter_mut()
            .find(|o| o.id == object)
        {
            occ.bounds = *bounds;
        }
    }

    /// Re-derive an object's placements by walking ancestors from `from`
    ///
    /// Climbs parent links until a cell fully contains the object (or the
    /// root is reached), then inserts downward from there, reaching every
    /// leaf the object now touches - including siblings of `from` it did not
    /// touch before. Insertion is idempotent, so leaves already listing the
    /// object are refreshed, not duplicated. Relocation cost scales with how
    /// far the object moved rather than with tree size. Returns the new
    /// placements; empty when the object has left the tree bounds entirely.
    pub fn search_upward(
        &mut self,
        from: CellId,
        object: ObjectId,
        bounds: &Aabb,
    ) -> Vec<(CellId, Containment)> {
        let mut node = from;
        while classify(bounds, &self.cells[node.index()].bounds) != Containment::Full {
            match self.cells[node.index()].parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
        // A disjoint root means the object is outside the tree: insert_at is
        // a no-op and the placements come back empty.
        let mut placements = Vec::new();
        self.insert_at(node, object, bounds, &mut placements);
        placements
    }

    /// Check whether a cell currently lists an object
    pub fn cell_contains(&self, cell: CellId, object: ObjectId) -> bool {
        self.cells[cell.index()].occupants.iter().any(|o| o.id == object)
    }

    /// Ids of the objects held directly by a cell
    pub fn cell_occupants(&self, cell: CellId) -> impl Iterator<Item = ObjectId> + '_ {
        self.cells[cell.index()].occupants.iter().map(|o| o.id)
    }

    /// Every leaf holding at least one occupant
    pub fn occupied_leaves(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_leaf() && !c.occupants.is_empty())
            .map(|(i, _)| CellId(i as u32))
    }

    /// Unordered candidate pairs among one cell's occupants
    ///
    /// The narrow phase consumes these same-cell groupings; each pair is
    /// yielded once with the occupants in list order.
    pub fn candidate_pairs_in_cell(&self, cell: CellId) -> Vec<(ObjectId, ObjectId)> {
        let occupants = &self.cells[cell.index()].occupants;
        let mut pairs = Vec::new();
        for (i, a) in occupants.iter().enumerate() {
            for b in &occupants[i + 1..] {
                pairs.push((a.id, b.id));
            }
        }
        pairs
    }

    /// Total occupant references across all leaves
    ///
    /// A straddling object is counted once per leaf listing it.
    pub fn occupant_entries(&self) -> usize {
        self.cells.iter().map(|c| c.occupants.len()).sum()
    }

    /// Discard every cell and occupant, keeping bounds and configuration
    pub fn clear(&mut self) {
        let bounds = self.cells[0].bounds;
        self.cells.clear();
        self.cells
            .push(SpatialCell::new(bounds, 0, None, self.config.max_occupancy));
    }
}
