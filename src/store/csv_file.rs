//! File-backed CSV sink
//!
//! One snapshot file per city and day, e.g. `output/events_mumbai_20251101.csv`.
//! Saves go through a temp file and rename so a crash mid-write never leaves
//! a truncated snapshot behind.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{City, EventRecord};
use crate::store::DatasetStore;
use crate::utils::error::StoreError;

/// CSV snapshot store rooted at a single file path
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional snapshot path for a city on a given day
    pub fn for_city(output_dir: &Path, city: City, day: NaiveDate) -> Self {
        let filename = format!("events_{}_{}.csv", city.key(), day.format("%Y%m%d"));
        Self {
            path: output_dir.join(filename),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetStore for CsvStore {
    async fn load(&self) -> Result<Vec<EventRecord>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No previous snapshot");
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }

        debug!(path = %self.path.display(), count = records.len(), "Loaded snapshot");
        Ok(records)
    }

    async fn save(&self, records: &[EventRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temporary file first
        let temp_path = self.path.with_extension("tmp");
        let mut writer = csv::Writer::from_path(&temp_path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        drop(writer);

        // Atomic rename
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), count = records.len(), "Saved snapshot");
        Ok(())
    }
}
