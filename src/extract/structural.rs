//! Structural extraction from raw listing markup
//!
//! Event detail pages are linked as `/events/<slug>/ET<digits>`, so the raw
//! listing markup can be mined without rendering: every anchor matching that
//! shape becomes a record, named after its slug, dated from the text of its
//! nearest block ancestor.

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::extract::{finish_record, EventExtractor, ExtractContext, ExtractSource};
use crate::models::{EventRecord, DATE_TBD, DEFAULT_CATEGORY, DEFAULT_NAME, DEFAULT_VENUE, PLATFORM_ORIGIN};
use crate::utils::{absolutize, title_case};

/// Anchor-walking extractor for server-rendered listing markup
pub struct StructuralExtractor {
    anchor_selector: Selector,
    anchor_re: Regex,
    slug_re: Regex,
    date_re: Regex,
    max_events: usize,
    item_delay: Duration,
}

/// Fields collected synchronously before records are materialized
///
/// The parsed document is not `Send`, so candidate collection finishes
/// before the politeness delays start awaiting.
struct Candidate {
    name: String,
    date: String,
    source_url: String,
}

impl StructuralExtractor {
    #[must_use]
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            anchor_selector: Selector::parse("a[href]").expect("invalid anchor selector"),
            anchor_re: Regex::new(r"/events/[^/]+/ET\d+").expect("invalid anchor pattern"),
            slug_re: Regex::new(r"/events/([^/]+)/").expect("invalid slug pattern"),
            date_re: Regex::new(r"\d{1,2}\s+[A-Za-z]{3,9}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}")
                .expect("invalid date pattern"),
            max_events: config.max_structural_events,
            item_delay: Duration::from_millis(config.item_delay_ms),
        }
    }

    /// Collect event anchors and their surrounding details from markup
    fn collect_candidates(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let mut candidates = Vec::new();

        for element in document.select(&self.anchor_selector) {
            if candidates.len() >= self.max_events {
                break;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !self.anchor_re.is_match(href) {
                continue;
            }

            let source_url = absolutize(href, PLATFORM_ORIGIN);

            let name = match self.slug_re.captures(&source_url).and_then(|c| c.get(1)) {
                Some(slug) => title_case(&slug.as_str().replace('-', " ")),
                None => DEFAULT_NAME.to_string(),
            };

            let date = self
                .nearest_block_date(element)
                .unwrap_or_else(|| DATE_TBD.to_string());

            candidates.push(Candidate {
                name,
                date,
                source_url,
            });
        }

        candidates
    }

    /// Scan the nearest div or article ancestor for a date-looking text line
    ///
    /// Only that one block is consulted; a dateless block means the record
    /// ships with the TBD sentinel even if a farther ancestor has dates.
    fn nearest_block_date(&self, element: ElementRef) -> Option<String> {
        let mut node = element.parent();

        while let Some(n) = node {
            if let Some(block) = ElementRef::wrap(n) {
                let tag = block.value().name();
                if tag == "div" || tag == "article" {
                    return self.first_date_line(block);
                }
            }
            node = n.parent();
        }

        None
    }

    fn first_date_line(&self, block: ElementRef) -> Option<String> {
        block
            .text()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| self.date_re.is_match(line))
            .map(|line| line.to_string())
    }
}

impl Default for StructuralExtractor {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

#[async_trait]
impl EventExtractor for StructuralExtractor {
    fn name(&self) -> &'static str {
        "structural"
    }

    async fn extract(&self, source: ExtractSource<'_>, ctx: &ExtractContext) -> Vec<EventRecord> {
        let ExtractSource::Markup(html) = source else {
            debug!("Structural extractor received a non-markup source");
            return Vec::new();
        };

        let candidates = self.collect_candidates(html);
        debug!(count = candidates.len(), "Collected event anchors");

        let mut records = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            records.push(finish_record(
                candidate.name,
                candidate.date,
                DEFAULT_VENUE.to_string(),
                DEFAULT_CATEGORY.to_string(),
                candidate.source_url,
                ctx,
            ));

            // Small delay between processing
            tokio::time::sleep(self.item_delay).await;
        }

        records
    }
}
