//! Dataset persistence
//!
//! Each run replaces a full snapshot of records: the previous snapshot is
//! loaded, reconciled with the incoming batch, and written back. The sinks
//! only load and save; reconciliation itself is sink-independent.

pub mod csv_file;
pub mod sheets;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::identity::classify_status;
use crate::models::EventRecord;
use crate::utils::error::StoreError;

pub use csv_file::CsvStore;
pub use sheets::SheetStore;

/// Column order shared by the tabular sinks
pub const COLUMNS: &[&str] = &[
    "event_name",
    "event_date",
    "venue",
    "city",
    "category",
    "url",
    "platform",
    "status",
    "last_updated",
    "event_id",
];

/// Load/save contract every sink implements
#[async_trait]
pub trait DatasetStore: std::fmt::Debug + Send + Sync {
    /// Load the previous snapshot, empty when none exists yet
    async fn load(&self) -> Result<Vec<EventRecord>, StoreError>;

    /// Replace the snapshot with `records`
    async fn save(&self, records: &[EventRecord]) -> Result<(), StoreError>;
}

/// Reconcile an incoming batch with the previous snapshot
///
/// The newest record per id survives: both batches are sorted together by
/// `last_updated` descending, stable with incoming listed first so incoming
/// wins exact timestamp ties, and the first occurrence of each id is kept.
/// Every survivor then gets its status refreshed against `now`, so stored
/// records age out even when the page no longer lists them.
pub fn merge(
    incoming: Vec<EventRecord>,
    existing: Vec<EventRecord>,
    now: NaiveDateTime,
) -> Vec<EventRecord> {
    let mut combined: Vec<EventRecord> = incoming.into_iter().chain(existing).collect();

    combined.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

    let mut seen = HashSet::new();
    combined.retain(|record| seen.insert(record.id.clone()));

    for record in &mut combined {
        record.status = classify_status(&record.date, now);
    }

    combined
}
