//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

/// Handle-based map using slot map for stable references
///
/// Keys stay valid across removals of other entries, making them safe to
/// store in spatial indices and tracking logs as non-owning back-references.
pub type HandleMap<K, T> = SlotMap<K, T>;
