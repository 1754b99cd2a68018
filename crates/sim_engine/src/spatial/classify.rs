//! Shape-vs-cell containment classification
//!
//! The broad phase never needs exact shape geometry; it only needs to know
//! whether a shape's world-space bounding extent is outside, straddling, or
//! fully inside a spatial cell. Convex hulls are reduced to their minimum
//! enclosing AABB before reaching this layer, so a `Partial`/`Full` answer
//! can be conservatively wider than the true hull geometry. That is fine:
//! the narrow phase makes the authoritative call.

use crate::scene::Aabb;

/// Relationship between a shape's bounding extent and a spatial cell
///
/// Boundary convention: cells are closed boxes. A shape exactly matching a
/// cell's bounds is `Full`; a shape touching a cell face from outside is
/// `Partial` with that cell. Touch-overlap is deliberate - a missed candidate
/// pair is a missed collision, a duplicate candidate is merely redundant work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Containment {
    /// No overlap on at least one axis
    Disjoint,
    /// Overlap on every axis, but at least one face of the shape lies outside
    Partial,
    /// The shape's bounds lie within the cell's bounds on all six sides
    Full,
}

/// Classify a shape's world-space bounding extent against a cell
///
/// Per axis, the shape interval `[smin, smax]` and cell interval
/// `[cmin, cmax]` are disjoint when `smax < cmin` or `smin > cmax`; the
/// shape is contained when `cmin <= smin` and `smax <= cmax`. Degenerate
/// (inverted) extents are a precondition violation and produce unspecified
/// classifications.
pub fn classify(shape: &Aabb, cell: &Aabb) -> Containment {
    if !cell.intersects(shape) {
        return Containment::Disjoint;
    }
    if cell.contains(shape) {
        Containment::Full
    } else {
        Containment::Partial
    }
}
