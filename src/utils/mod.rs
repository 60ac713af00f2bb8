//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;
pub mod retry;

use url::Url;

/// Resolve a possibly-relative link against the page origin
///
/// Absolute links are returned unchanged; everything else is joined onto
/// `origin` so stored records never carry relative URLs.
pub fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    match Url::parse(origin).and_then(|base| base.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", origin.trim_end_matches('/'), href),
    }
}

/// Title-case each whitespace-separated word
///
/// Used to turn URL slugs ("sunburn-arena" after hyphen replacement) into
/// display names ("Sunburn Arena").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
