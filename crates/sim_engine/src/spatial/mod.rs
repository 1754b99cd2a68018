//! Spatial partitioning data structures
//!
//! Provides the octree spatial index, the shape-vs-cell containment
//! predicates, and the incremental occupancy tracker that keeps the index
//! current as objects move without full-tree rebuilds.

mod classify;
mod octree;
mod tracker;

pub use classify::{classify, Containment};
pub use octree::{CellId, Octree, OctreeConfig, SpatialCell};
pub use tracker::{CellStatus, OccupancyTracker};
