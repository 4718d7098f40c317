//! Domain error types.
//!
//! These errors represent broken cross-references between decoded records
//! and the shared tables they point into. They are distinct from transport
//! and wire-format errors.

/// Domain-level errors for table lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An index points past the end of its table. Usually means a trip is
    /// being resolved against a `CommonData` from a different response.
    #[error("{table} index {index} out of bounds (table has {len} entries)")]
    DanglingIndex {
        table: &'static str,
        index: usize,
        len: usize,
    },
}
