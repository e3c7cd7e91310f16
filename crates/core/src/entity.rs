//! Stored records whose identity outlives their stock changes.

use crate::version::Versioned;

/// A stored record: a store-assigned key plus a revision counter.
///
/// Keys are small `Copy` values ordered by assignment, so stores can index
/// records in a sorted map and list them in insertion order.
pub trait Entity: Versioned {
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// `(id, version)` of this revision, as compared by optimistic writes.
    fn revision(&self) -> (Self::Id, u64) {
        (*self.id(), self.version())
    }
}
