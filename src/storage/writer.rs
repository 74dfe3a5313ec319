//! Upsert writer
//!
//! Turns a batch write into a `WriteOutcome` so the caller decides what a
//! failed write means. Errors are logged here and never propagated.

use crate::catalog::NormalizedRecord;
use crate::storage::{StorageError, StoreConnector};

/// Result of writing one page's records
#[derive(Debug)]
pub enum WriteOutcome {
    /// The batch committed; `inserted` excludes (title, price) conflicts
    Committed { attempted: usize, inserted: u64 },

    /// The batch was rolled back and its records dropped
    RolledBack {
        attempted: usize,
        error: StorageError,
    },
}

impl WriteOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Rows inserted (zero for a rolled back batch)
    pub fn inserted(&self) -> u64 {
        match self {
            Self::Committed { inserted, .. } => *inserted,
            Self::RolledBack { .. } => 0,
        }
    }
}

/// Writes records with insert-or-ignore semantics in a single transaction
///
/// An empty batch commits trivially without opening a connection.
pub async fn write_records(
    connector: &StoreConnector,
    records: Vec<NormalizedRecord>,
) -> WriteOutcome {
    let attempted = records.len();
    if attempted == 0 {
        return WriteOutcome::Committed {
            attempted,
            inserted: 0,
        };
    }

    match connector.insert_batch(records).await {
        Ok(inserted) => {
            tracing::info!(
                "{} records saved ({} new, {} already present)",
                attempted,
                inserted,
                (attempted as u64).saturating_sub(inserted)
            );
            WriteOutcome::Committed {
                attempted,
                inserted,
            }
        }
        Err(error) => {
            tracing::error!("Failed to save {} records, batch rolled back: {}", attempted, error);
            WriteOutcome::RolledBack { attempted, error }
        }
    }
}
