//! Scene-level spatial types
//!
//! Provides the axis-aligned bounds primitive shared by the spatial index
//! and the collision pipeline.

mod bounds;

pub use bounds::Aabb;
