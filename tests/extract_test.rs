//! Integration tests for record extraction over realistic listing markup

mod common;

use chrono::NaiveDate;
use marquee::config::ExtractConfig;
use marquee::extract::{
    CardExtractor, EventExtractor, ExtractContext, ExtractSource, StructuralExtractor,
};
use marquee::fetch::cards_from_html;
use marquee::models::City;

fn fast_extract_config() -> ExtractConfig {
    ExtractConfig {
        item_delay_ms: 0,
        ..ExtractConfig::default()
    }
}

fn ctx(city: City) -> ExtractContext {
    ExtractContext::new(
        city,
        NaiveDate::from_ymd_opt(2025, 11, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
        format!("https://in.bookmyshow.com{}", city.explore_path()),
    )
}

/// Event anchors become records; other links on the page are ignored
#[tokio::test]
async fn test_structural_extracts_only_event_anchors() {
    let markup = common::listing_markup(3);
    let extractor = StructuralExtractor::new(&fast_extract_config());

    let records = extractor
        .extract(ExtractSource::Markup(&markup), &ctx(City::Mumbai))
        .await;

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.source_url.contains("/events/")));
    assert!(records.iter().all(|r| r.city == "Mumbai"));
}

/// Re-extracting unchanged markup yields byte-identical ids
#[tokio::test]
async fn test_extraction_ids_are_stable_across_passes() {
    let markup = common::listing_markup(4);
    let extractor = StructuralExtractor::new(&fast_extract_config());

    let first = extractor
        .extract(ExtractSource::Markup(&markup), &ctx(City::Pune))
        .await;
    let second = extractor
        .extract(ExtractSource::Markup(&markup), &ctx(City::Pune))
        .await;

    let first_ids: Vec<&str> = first.iter().map(|r| r.id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|r| r.id.as_str()).collect();

    assert_eq!(first_ids, second_ids);
    assert!(first_ids.iter().all(|id| id.len() == 16));
}

/// The same logical event scraped for two cities gets two distinct ids
#[tokio::test]
async fn test_city_participates_in_identity() {
    let markup = common::listing_markup(1);
    let extractor = StructuralExtractor::new(&fast_extract_config());

    let mumbai = extractor
        .extract(ExtractSource::Markup(&markup), &ctx(City::Mumbai))
        .await;
    let pune = extractor
        .extract(ExtractSource::Markup(&markup), &ctx(City::Pune))
        .await;

    assert_ne!(mumbai[0].id, pune[0].id);
}

/// Extractors are used as trait objects by the pipeline
#[tokio::test]
async fn test_extractors_as_trait_objects() {
    let extractors: Vec<Box<dyn EventExtractor>> = vec![
        Box::new(StructuralExtractor::new(&fast_extract_config())),
        Box::new(CardExtractor::new(&fast_extract_config())),
    ];

    let markup = common::listing_markup(2);
    let context = ctx(City::Delhi);

    let structural = extractors[0]
        .extract(ExtractSource::Markup(&markup), &context)
        .await;
    let cards = extractors[1]
        .extract(ExtractSource::Markup(&markup), &context)
        .await;

    assert_eq!(extractors[0].name(), "structural");
    assert_eq!(structural.len(), 2);
    // The card extractor only understands card sources
    assert!(cards.is_empty());
}

/// Card candidates are collected from rendered markup by class heuristics
#[test]
fn test_cards_from_rendered_markup() {
    let rendered = r#"
        <html><body>
            <div class="sc-event-card-a1">
                Sunburn Arena
                <p>15 Nov 2025</p>
                <a href="/events/sunburn-arena/ET00311234">book</a>
            </div>
            <div class="sc-event-card-b2">
                Comedy Night
                <p>20 Nov 2025</p>
            </div>
            <div class="unrelated">footer</div>
        </body></html>
    "#;

    let cards = cards_from_html(rendered, 50);

    assert_eq!(cards.len(), 2);
    assert!(cards[0].text.contains("Sunburn Arena"));
    assert_eq!(
        cards[0].link.as_deref(),
        Some("/events/sunburn-arena/ET00311234")
    );
    assert!(cards[1].link.is_none());
}

/// Rendered cards flow through the card extractor into full records
#[tokio::test]
async fn test_rendered_cards_become_records() {
    let rendered = r#"
        <html><body>
            <article>
                Winter Art Fair
                <p>2025-12-05</p>
                <p>Jio Convention Centre</p>
                <a href="/events/winter-art-fair/ET00333456">tickets</a>
            </article>
        </body></html>
    "#;

    let cards = cards_from_html(rendered, 50);
    let extractor = CardExtractor::new(&fast_extract_config());

    let records = extractor
        .extract(ExtractSource::Cards(&cards), &ctx(City::Bangalore))
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Winter Art Fair");
    assert_eq!(records[0].date, "2025-12-05");
    assert_eq!(records[0].venue, "Jio Convention Centre");
    assert_eq!(
        records[0].source_url,
        "https://in.bookmyshow.com/events/winter-art-fair/ET00333456"
    );
    assert_eq!(records[0].city, "Bangalore");
}
