//! Remote spreadsheet sink
//!
//! Talks to a sheets-style REST service: one worksheet holds the snapshot
//! as a header row followed by one row per record. Saving clears the
//! worksheet and appends everything back, so the remote copy mirrors the
//! replace semantics of the CSV sink.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::StoreConfig;
use crate::models::{EventRecord, EventStatus};
use crate::store::{DatasetStore, COLUMNS};
use crate::utils::error::StoreError;
use crate::utils::retry::{with_retry_if, RetryConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Spreadsheet-backed snapshot store
#[derive(Debug)]
pub struct SheetStore {
    client: Client,
    base: String,
    sheet: String,
    token: Option<String>,
    retry: RetryConfig,
}

#[derive(Debug, Serialize)]
struct ValuesPayload {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetStore {
    /// Create a store for a worksheet on the given service endpoint
    pub fn new(base_url: &str, sheet: &str, token: Option<String>) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
            sheet: sheet.to_string(),
            token,
            retry: RetryConfig::default(),
        })
    }

    /// Build from store settings, requiring a configured endpoint
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let base = config.sheet_url.as_deref().ok_or_else(|| {
            StoreError::NotConfigured("sheet_url is required for the sheet backend".to_string())
        })?;

        Self::new(base, &config.sheet_name, config.sheet_token.clone())
    }

    fn values_url(&self, suffix: &str) -> String {
        format!("{}/v1/sheets/{}/values{}", self.base, self.sheet, suffix)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_values(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self
            .authorize(self.client.get(self.values_url("")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: ValuesResponse = response.json().await?;
        Ok(body.values)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.post(self.values_url(":clear")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn append(&self, payload: &ValuesPayload) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.post(self.values_url(":append")))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl DatasetStore for SheetStore {
    async fn load(&self) -> Result<Vec<EventRecord>, StoreError> {
        let values = with_retry_if(&self.retry, || self.fetch_values(), is_transient).await?;

        let mut rows = values.into_iter();
        // First row is the header; an empty worksheet has no rows at all
        if rows.next().is_none() {
            debug!(sheet = %self.sheet, "Worksheet is empty");
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for row in rows {
            records.push(from_row(&row)?);
        }

        debug!(sheet = %self.sheet, count = records.len(), "Loaded snapshot");
        Ok(records)
    }

    async fn save(&self, records: &[EventRecord]) -> Result<(), StoreError> {
        let mut values = Vec::with_capacity(records.len() + 1);
        values.push(COLUMNS.iter().map(|c| (*c).to_string()).collect());
        values.extend(records.iter().map(to_row));
        let payload = ValuesPayload { values };

        with_retry_if(&self.retry, || self.clear(), is_transient).await?;
        with_retry_if(&self.retry, || self.append(&payload), is_transient).await?;

        debug!(sheet = %self.sheet, count = records.len(), "Saved snapshot");
        Ok(())
    }
}

fn is_transient(error: &StoreError) -> bool {
    match error {
        StoreError::Api { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
        StoreError::Http(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}

fn to_row(record: &EventRecord) -> Vec<String> {
    vec![
        record.name.clone(),
        record.date.clone(),
        record.venue.clone(),
        record.city.clone(),
        record.category.clone(),
        record.source_url.clone(),
        record.platform.clone(),
        record.status.as_str().to_string(),
        record.last_updated.clone(),
        record.id.clone(),
    ]
}

fn from_row(row: &[String]) -> Result<EventRecord, StoreError> {
    if row.len() < COLUMNS.len() {
        return Err(StoreError::MalformedRow(format!(
            "expected {} columns, got {}",
            COLUMNS.len(),
            row.len()
        )));
    }

    Ok(EventRecord {
        name: row[0].clone(),
        date: row[1].clone(),
        venue: row[2].clone(),
        city: row[3].clone(),
        category: row[4].clone(),
        source_url: row[5].clone(),
        platform: row[6].clone(),
        status: EventStatus::parse(&row[7]).unwrap_or_default(),
        last_updated: row[8].clone(),
        id: row[9].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EventRecord {
        EventRecord {
            name: "Comedy Night".to_string(),
            date: "2025-12-05".to_string(),
            venue: "Canvas Laugh Club".to_string(),
            city: "Mumbai".to_string(),
            category: "Comedy".to_string(),
            source_url: "https://in.bookmyshow.com/events/comedy-night/ET00355555".to_string(),
            platform: "BookMyShow".to_string(),
            status: EventStatus::Upcoming,
            last_updated: "2025-11-01 12:00:00".to_string(),
            id: "ab12cd34ef56ab78".to_string(),
        }
    }

    #[test]
    fn test_row_roundtrip() {
        let original = record();
        let row = to_row(&original);
        assert_eq!(row.len(), COLUMNS.len());

        let restored = from_row(&row).unwrap();
        assert_eq!(restored.name, original.name);
        assert_eq!(restored.status, original.status);
        assert_eq!(restored.id, original.id);
    }

    #[test]
    fn test_from_row_rejects_short_rows() {
        let row = vec!["only".to_string(), "three".to_string(), "cells".to_string()];
        let err = from_row(&row).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow(_)));
    }

    #[test]
    fn test_from_row_unknown_status_defaults_to_active() {
        let mut row = to_row(&record());
        row[7] = "???".to_string();

        let restored = from_row(&row).unwrap();
        assert_eq!(restored.status, EventStatus::Active);
    }

    #[test]
    fn test_values_url_shapes() {
        let store = SheetStore::new("https://sheets.example.com/", "events", None).unwrap();

        assert_eq!(
            store.values_url(""),
            "https://sheets.example.com/v1/sheets/events/values"
        );
        assert_eq!(
            store.values_url(":clear"),
            "https://sheets.example.com/v1/sheets/events/values:clear"
        );
        assert_eq!(
            store.values_url(":append"),
            "https://sheets.example.com/v1/sheets/events/values:append"
        );
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = StoreConfig {
            backend: "sheet".to_string(),
            ..Default::default()
        };

        let err = SheetStore::from_config(&config).unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured(_)));
    }

    #[test]
    fn test_values_response_tolerates_missing_field() {
        let body: ValuesResponse = serde_json::from_str("{}").unwrap();
        assert!(body.values.is_empty());
    }
}
