//! Rendered-page fallback support
//!
//! When structural extraction finds nothing in the raw listing markup, the
//! pipeline asks a rendering provider for the card elements a browser would
//! see after JavaScript runs. The provider seam keeps the pipeline
//! independent of how the rendering actually happens.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::config::Config;
use crate::fetch::solver::SolverClient;
use crate::fetch::FetchStrategy;
use crate::utils::error::FetchError;

/// Card selectors tried in order; the first one with any matches wins
pub const CARD_SELECTORS: &[&str] = &[
    "div[class*='card']",
    "article",
    "a[class*='__event']",
    "div[class*='EventCard']",
];

/// One rendered card: its visible text and the first link found inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    /// Visible text content, one fragment per line
    pub text: String,

    /// First `href` inside the card, still possibly relative
    pub link: Option<String>,
}

/// Source of rendered card elements for a listing page path
#[async_trait]
pub trait RenderProvider: Send + Sync {
    /// Render the page at `path` and return its event-like card elements
    async fn render(&self, path: &str) -> Result<Vec<RenderedCard>, FetchError>;
}

/// Collect card elements from rendered HTML
///
/// Tries each selector in `CARD_SELECTORS` until one matches, then captures
/// at most `max_cards` elements with their text lines and first link.
pub fn cards_from_html(html: &str, max_cards: usize) -> Vec<RenderedCard> {
    let document = Html::parse_document(html);
    let link_selector = match Selector::parse("a[href]") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    for raw in CARD_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };

        let matches: Vec<_> = document.select(&selector).collect();
        if matches.is_empty() {
            continue;
        }

        return matches
            .into_iter()
            .take(max_cards)
            .map(|element| {
                let text = element
                    .text()
                    .map(str::trim)
                    .filter(|fragment| !fragment.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");

                let link = if element.value().name() == "a" {
                    element.value().attr("href").map(str::to_string)
                } else {
                    element
                        .select(&link_selector)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string)
                };

                RenderedCard { text, link }
            })
            .collect();
    }

    Vec::new()
}

/// Rendering provider backed by the challenge-solver sidecar
///
/// The sidecar drives a real browser, so its response body is the post-render
/// document and card collection can run over it directly.
pub struct SolverRender {
    solver: SolverClient,
    max_cards: usize,
}

impl SolverRender {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Unavailable` when no solver endpoint is configured
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            solver: SolverClient::new(&config.fetch)?,
            max_cards: config.extract.max_card_events,
        })
    }
}

#[async_trait]
impl RenderProvider for SolverRender {
    async fn render(&self, path: &str) -> Result<Vec<RenderedCard>, FetchError> {
        let html = self.solver.fetch(path).await?;
        Ok(cards_from_html(&html, self.max_cards))
    }
}
