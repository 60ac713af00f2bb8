//! Common test utilities

use std::path::Path;

use marquee::config::Config;
use marquee::models::{EventRecord, EventStatus};

/// Create a test record with default values
#[allow(dead_code)]
pub fn test_record(id: &str, last_updated: &str) -> EventRecord {
    EventRecord {
        name: format!("Event {id}"),
        date: "15 Dec 2025".to_string(),
        venue: "Jio Gardens".to_string(),
        city: "Mumbai".to_string(),
        category: "Music".to_string(),
        source_url: format!("https://in.bookmyshow.com/events/event-{id}/ET00300001"),
        platform: "BookMyShow".to_string(),
        status: EventStatus::Upcoming,
        last_updated: last_updated.to_string(),
        id: id.to_string(),
    }
}

/// Configuration pointed at a mock server: plain client only, fast retries,
/// no politeness delays, CSV snapshots under `output`
#[allow(dead_code)]
pub fn test_config(base_url: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.fetch.base_url = Some(base_url.to_string());
    config.fetch.use_impersonation = false;
    config.fetch.base_delay_ms = 10;
    config.fetch.rate_limit = 100.0;
    config.extract.item_delay_ms = 0;
    config.store.output_dir = output.to_path_buf();
    config
}

/// Listing page markup with `count` event anchors plus one non-event link
#[allow(dead_code)]
pub fn listing_markup(count: usize) -> String {
    let mut tiles = String::new();
    for i in 0..count {
        tiles.push_str(&format!(
            r#"<div class="tile">
                <a href="/events/test-show-{i}/ET0031{i:04}">poster</a>
                <span>15 Dec 2025</span>
            </div>"#
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html><body>
    <div class="listing">
        {tiles}
        <a href="/movies/some-film/MV00012345">not an event</a>
    </div>
</body></html>"#
    )
}
