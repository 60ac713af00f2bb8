//! CLI command implementations
//!
//! Thin wrappers over the library pipeline: argument massaging, console
//! summaries, and shutdown handling for the batch runner.

pub mod batch;
pub mod scrape;

pub use batch::batch;
pub use scrape::scrape;

use marquee::models::City;

/// List the supported cities with their platform codes
pub fn cities() {
    println!("Supported cities");
    println!("================");
    for city in City::all() {
        println!("  {:<12} code: {}", city.key(), city.code());
    }
}
