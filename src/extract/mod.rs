//! Event extraction from listing pages
//!
//! Two extractors share one contract: the structural extractor walks event
//! anchors in raw listing markup, and the card extractor applies line
//! heuristics to rendered card elements when the markup route finds nothing.
//! Failures are absorbed per item, so one malformed listing never discards
//! the rest of a page.

pub mod cards;
pub mod structural;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::fetch::RenderedCard;
use crate::identity::{classify_status, derive_id};
use crate::models::{City, EventRecord, PLATFORM, TIMESTAMP_FORMAT};

pub use cards::CardExtractor;
pub use structural::StructuralExtractor;

/// Input handed to an extractor
pub enum ExtractSource<'a> {
    /// Raw listing page markup
    Markup(&'a str),

    /// Card elements collected from a rendered page
    Cards(&'a [RenderedCard]),
}

/// Per-run context shared by all records of one extraction pass
pub struct ExtractContext {
    /// City the listing page belongs to
    pub city: City,

    /// Single reference instant for status and timestamps
    pub now: NaiveDateTime,

    /// Absolute URL of the page being extracted, used when a record has no
    /// link of its own
    pub page_url: String,
}

impl ExtractContext {
    pub fn new(city: City, now: NaiveDateTime, page_url: String) -> Self {
        Self {
            city,
            now,
            page_url,
        }
    }
}

/// Turns one kind of extraction source into event records
#[async_trait]
pub trait EventExtractor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract event records, returning whatever subset succeeded
    async fn extract(&self, source: ExtractSource<'_>, ctx: &ExtractContext) -> Vec<EventRecord>;
}

/// Assemble a full record from extracted fields
///
/// Derivation of identity, status and timestamp is identical for both
/// extractors, so it lives here.
pub(crate) fn finish_record(
    name: String,
    date: String,
    venue: String,
    category: String,
    source_url: String,
    ctx: &ExtractContext,
) -> EventRecord {
    let status = classify_status(&date, ctx.now);
    let id = derive_id(&name, &date, &venue, ctx.city.key());

    EventRecord {
        name,
        date,
        venue,
        city: ctx.city.display_name().to_string(),
        category,
        source_url,
        platform: PLATFORM.to_string(),
        status,
        last_updated: ctx.now.format(TIMESTAMP_FORMAT).to_string(),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use chrono::NaiveDate;

    fn test_ctx() -> ExtractContext {
        ExtractContext::new(
            City::Mumbai,
            NaiveDate::from_ymd_opt(2025, 11, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            "https://in.bookmyshow.com/explore/events-mumbai".to_string(),
        )
    }

    #[test]
    fn test_finish_record_fills_derived_fields() {
        let ctx = test_ctx();
        let record = finish_record(
            "Indie Night".to_string(),
            "2025-11-03".to_string(),
            "Blue Gate".to_string(),
            "General".to_string(),
            "https://in.bookmyshow.com/events/indie-night/ET00301111".to_string(),
            &ctx,
        );

        assert_eq!(record.platform, PLATFORM);
        assert_eq!(record.city, "Mumbai");
        assert_eq!(record.status, EventStatus::Active);
        assert_eq!(record.last_updated, "2025-11-01 12:00:00");
        assert_eq!(record.id.len(), 16);
    }

    #[test]
    fn test_finish_record_id_matches_direct_derivation() {
        let ctx = test_ctx();
        let record = finish_record(
            "Indie Night".to_string(),
            "TBD".to_string(),
            "Various Venues".to_string(),
            "General".to_string(),
            "https://in.bookmyshow.com/e/1".to_string(),
            &ctx,
        );

        assert_eq!(
            record.id,
            derive_id("Indie Night", "TBD", "Various Venues", "mumbai")
        );
    }
}
