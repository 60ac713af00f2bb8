//! Heuristic extraction from rendered card elements
//!
//! Rendered cards carry no reliable markup structure, so fields are picked
//! from their visible text lines: the first line names the event, an early
//! line that looks like a full date becomes the date, and a short digit-free
//! line near the end is taken as the venue.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::extract::{finish_record, EventExtractor, ExtractContext, ExtractSource};
use crate::fetch::RenderedCard;
use crate::models::{
    EventRecord, DATE_TBD, DEFAULT_CATEGORY, DEFAULT_NAME, DEFAULT_VENUE, PLATFORM_ORIGIN,
};
use crate::utils::absolutize;

/// Longest line still considered a venue name
const MAX_VENUE_LINE_CHARS: usize = 60;

/// Line-scoring extractor for rendered card elements
pub struct CardExtractor {
    date_re: Regex,
    max_events: usize,
}

impl CardExtractor {
    #[must_use]
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            // Unlike the structural pattern, slash dates here must carry a year
            date_re: Regex::new(r"\d{1,2}\s+[A-Za-z]{3,9}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}")
                .expect("invalid date pattern"),
            max_events: config.max_card_events,
        }
    }

    fn record_from_card(&self, card: &RenderedCard, ctx: &ExtractContext) -> EventRecord {
        let lines: Vec<&str> = card
            .text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let name = lines
            .first()
            .map(|line| line.to_string())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        // A date sits in the lines right after the name when present at all
        let date = lines
            .iter()
            .skip(1)
            .take(3)
            .find(|line| self.date_re.is_match(line))
            .map(|line| line.to_string())
            .unwrap_or_else(|| DATE_TBD.to_string());

        // Venues cluster near the bottom of a card: short lines without digits
        let tail_start = lines.len().saturating_sub(3);
        let venue = lines[tail_start..]
            .iter()
            .find(|line| {
                line.chars().count() < MAX_VENUE_LINE_CHARS
                    && !line.chars().any(|c| c.is_ascii_digit())
            })
            .map(|line| line.to_string())
            .unwrap_or_else(|| DEFAULT_VENUE.to_string());

        let source_url = card
            .link
            .as_deref()
            .filter(|href| !href.is_empty())
            .map(|href| absolutize(href, PLATFORM_ORIGIN))
            .unwrap_or_else(|| ctx.page_url.clone());

        finish_record(
            name,
            date,
            venue,
            DEFAULT_CATEGORY.to_string(),
            source_url,
            ctx,
        )
    }
}

impl Default for CardExtractor {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

#[async_trait]
impl EventExtractor for CardExtractor {
    fn name(&self) -> &'static str {
        "cards"
    }

    async fn extract(&self, source: ExtractSource<'_>, ctx: &ExtractContext) -> Vec<EventRecord> {
        let ExtractSource::Cards(cards) = source else {
            debug!("Card extractor received a non-card source");
            return Vec::new();
        };

        cards
            .iter()
            .take(self.max_events)
            .map(|card| self.record_from_card(card, ctx))
            .collect()
    }
}
