//! Optimistic concurrency primitives.

use crate::error::{DomainError, DomainResult};

/// Entities whose persisted state carries a monotonically increasing revision.
pub trait Versioned {
    /// Store-managed revision of the entity's state (+1 per successful write).
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for a store write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking.
    Any,
    /// Require the stored entity to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
