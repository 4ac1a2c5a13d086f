//! Runtime event stream payloads.

use crate::types::VoterId;

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A voter was registered and persisted.
    Registered {
        /// Full identifier of the new record.
        voter_id: VoterId,
    },
    /// A submission failed validation.
    Rejected {
        /// Number of violated rules.
        errors: usize,
    },
    /// A snapshot was exported.
    Exported {
        /// Records in the snapshot.
        records: usize,
    },
}
