//! Run record store port

use crate::core::models::RunRecord;

/// Durable storage for one task's [`RunRecord`]
pub trait RecordStore: Send + Sync {
    /// Load the stored record
    ///
    /// Missing, unreadable or incompatible state loads as `None`.
    fn load(&self) -> Option<RunRecord>;

    /// Persist a record, replacing any previous one
    fn save(&self, record: &RunRecord) -> anyhow::Result<()>;

    /// Delete the stored record
    ///
    /// Returns whether anything was removed.
    fn clear(&self) -> anyhow::Result<bool>;
}
