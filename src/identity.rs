//! Stable event identity and temporal status classification
//!
//! Identity is a truncated SHA-256 digest of the normalized
//! `(name, date, venue, city)` tuple. A keyed or per-process randomized
//! hasher would make ids drift between runs and break deduplication against
//! previously persisted datasets, so the digest is always SHA-256.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use sha2::{Digest, Sha256};

use crate::models::EventStatus;

/// Date formats accepted by [`classify_status`], tried in order
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d/%m/%Y", "%b %d, %Y"];

/// Events dated within this many days of now are Active rather than Upcoming
const ACTIVE_WINDOW_DAYS: i64 = 7;

/// Derive a stable 16-character id for an event
///
/// The id is a function of the four fields lowercased and joined with `_`,
/// so re-extracting the same listing yields the same id across runs and
/// process restarts.
pub fn derive_id(name: &str, date: &str, venue: &str, city: &str) -> String {
    let key = format!(
        "{}_{}_{}_{}",
        name.to_lowercase(),
        date.to_lowercase(),
        venue.to_lowercase(),
        city.to_lowercase()
    );

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    digest[..16].to_string()
}

/// Classify an event's status from its free-form date text
///
/// Tries each format in [`DATE_FORMATS`]; the first that parses decides:
/// a date at midnight before `now` is Expired, within the next 7 days is
/// Active, further out is Upcoming.
///
/// When no format matches (including the "TBD" sentinel and partial dates
/// like "25 Dec" with no year) the result is Active. That default keeps
/// unparsed-but-likely-current listings visible in the active view; it is a
/// documented approximation, not an error path.
pub fn classify_status(date_str: &str, now: NaiveDateTime) -> EventStatus {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), format) {
            let event_dt = date.and_time(NaiveTime::MIN);

            return if event_dt < now {
                EventStatus::Expired
            } else if event_dt <= now + Duration::days(ACTIVE_WINDOW_DAYS) {
                EventStatus::Active
            } else {
                EventStatus::Upcoming
            };
        }
    }

    EventStatus::Active
}
