// Core data structures for the marquee scraper

use serde::{Deserialize, Serialize};

/// Platform the records are sourced from
pub const PLATFORM: &str = "BookMyShow";

/// Origin used to absolutize relative event links
pub const PLATFORM_ORIGIN: &str = "https://in.bookmyshow.com";

/// Sentinel name when a card exposes no usable text
pub const DEFAULT_NAME: &str = "Unknown Event";

/// Sentinel venue when no venue-like line is found
pub const DEFAULT_VENUE: &str = "Various Venues";

/// Default category for listings that do not expose one
pub const DEFAULT_CATEGORY: &str = "General";

/// Sentinel date when no date-like line is found
pub const DATE_TBD: &str = "TBD";

/// Format used for the `last_updated` field
///
/// Lexicographic order on this format matches chronological order, which the
/// merge step relies on when sorting by `last_updated`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single extracted event listing
///
/// `id` is derived from `(name, date, venue, city)` and stays stable across
/// runs as long as those fields do not change. `status` is recomputed from
/// `date` every time the record is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventRecord {
    /// Serialized names follow the historical dataset schema, so snapshots
    /// written by earlier tooling keep loading
    #[serde(rename = "event_name")]
    pub name: String,
    /// Free-form date text as it appeared on the page, or "TBD"
    #[serde(rename = "event_date")]
    pub date: String,
    pub venue: String,
    /// Display form of the city, e.g. "Mumbai"
    pub city: String,
    pub category: String,
    /// Always absolute; relative links are rewritten against the platform origin
    #[serde(rename = "url")]
    pub source_url: String,
    pub platform: String,
    pub status: EventStatus,
    /// Extraction timestamp in [`TIMESTAMP_FORMAT`]
    pub last_updated: String,
    #[serde(rename = "event_id")]
    pub id: String,
}

/// Temporal status of an event relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventStatus {
    /// Happening within the next 7 days, or date could not be parsed
    #[default]
    Active,
    /// More than 7 days out
    Upcoming,
    /// Date is in the past
    Expired,
}

impl EventStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Upcoming => "Upcoming",
            Self::Expired => "Expired",
        }
    }

    /// Create from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "upcoming" => Some(Self::Upcoming),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported cities with their platform-specific codes
///
/// The platform addresses some cities under a different slug than their
/// common name (Delhi is listed as "ncr", Bangalore as "bengaluru").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Mumbai,
    Delhi,
    Bangalore,
    Hyderabad,
    Pune,
    Kolkata,
    Chennai,
}

impl City {
    /// Lookup key used in filenames and configuration
    pub fn key(&self) -> &'static str {
        match self {
            Self::Mumbai => "mumbai",
            Self::Delhi => "delhi",
            Self::Bangalore => "bangalore",
            Self::Hyderabad => "hyderabad",
            Self::Pune => "pune",
            Self::Kolkata => "kolkata",
            Self::Chennai => "chennai",
        }
    }

    /// Platform city code used in explore URLs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Mumbai => "mumbai",
            Self::Delhi => "ncr",
            Self::Bangalore => "bengaluru",
            Self::Hyderabad => "hyderabad",
            Self::Pune => "pune",
            Self::Kolkata => "kolkata",
            Self::Chennai => "chennai",
        }
    }

    /// Display form stored on records
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mumbai => "Mumbai",
            Self::Delhi => "Delhi",
            Self::Bangalore => "Bangalore",
            Self::Hyderabad => "Hyderabad",
            Self::Pune => "Pune",
            Self::Kolkata => "Kolkata",
            Self::Chennai => "Chennai",
        }
    }

    /// Path of the explore page listing events for this city
    pub fn explore_path(&self) -> String {
        format!("/explore/events-{}", self.code())
    }

    /// Path of the city landing page, which the rendered fallback scrapes
    pub fn landing_path(&self) -> String {
        format!("/{}", self.code())
    }

    /// Create from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mumbai" => Some(Self::Mumbai),
            "delhi" | "ncr" => Some(Self::Delhi),
            "bangalore" | "bengaluru" => Some(Self::Bangalore),
            "hyderabad" => Some(Self::Hyderabad),
            "pune" => Some(Self::Pune),
            "kolkata" => Some(Self::Kolkata),
            "chennai" => Some(Self::Chennai),
            _ => None,
        }
    }

    /// Create from string, falling back to Mumbai for unknown names
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Mumbai)
    }

    /// Get all supported cities
    pub fn all() -> Vec<Self> {
        vec![
            Self::Mumbai,
            Self::Delhi,
            Self::Bangalore,
            Self::Hyderabad,
            Self::Pune,
            Self::Kolkata,
            Self::Chennai,
        ]
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_codes() {
        assert_eq!(City::Mumbai.code(), "mumbai");
        assert_eq!(City::Delhi.code(), "ncr");
        assert_eq!(City::Bangalore.code(), "bengaluru");
    }

    #[test]
    fn test_city_parse() {
        assert_eq!(City::parse("mumbai"), Some(City::Mumbai));
        assert_eq!(City::parse("Delhi"), Some(City::Delhi));
        assert_eq!(City::parse("BENGALURU"), Some(City::Bangalore));
        assert_eq!(City::parse("atlantis"), None);
    }

    #[test]
    fn test_city_fallback_to_default() {
        assert_eq!(City::parse_or_default("atlantis"), City::Mumbai);
        assert_eq!(City::parse_or_default("pune"), City::Pune);
    }

    #[test]
    fn test_explore_path() {
        assert_eq!(City::Delhi.explore_path(), "/explore/events-ncr");
        assert_eq!(City::Chennai.explore_path(), "/explore/events-chennai");
    }

    #[test]
    fn test_landing_path() {
        assert_eq!(City::Bangalore.landing_path(), "/bengaluru");
        assert_eq!(City::Mumbai.landing_path(), "/mumbai");
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            EventStatus::Active,
            EventStatus::Upcoming,
            EventStatus::Expired,
        ] {
            assert_eq!(EventStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EventStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = EventRecord {
            name: "Sunburn Arena".to_string(),
            date: "25 Dec 2025".to_string(),
            venue: DEFAULT_VENUE.to_string(),
            city: "Mumbai".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            source_url: format!("{PLATFORM_ORIGIN}/events/sunburn-arena/ET00311234"),
            platform: PLATFORM.to_string(),
            status: EventStatus::Upcoming,
            last_updated: "2025-08-20 09:00:00".to_string(),
            id: "a1b2c3d4e5f60718".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let restored: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_record_serializes_with_dataset_column_names() {
        let record = EventRecord {
            name: "Sunburn Arena".to_string(),
            id: "a1b2c3d4e5f60718".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event_name"], "Sunburn Arena");
        assert_eq!(json["event_id"], "a1b2c3d4e5f60718");
        assert!(json.get("url").is_some());
        assert!(json.get("source_url").is_none());
    }

    #[test]
    fn test_timestamp_format_sorts_chronologically() {
        let earlier = "2025-08-20 09:00:00";
        let later = "2025-08-21 08:59:59";
        assert!(earlier < later);
    }
}
