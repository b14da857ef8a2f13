//! # Beacon HTTP
//!
//! Network-facing collaborators of the beacon: [`HttpFetcher`] pulls the
//! dashboard page and [`ConsoleClassifier`] turns it into build counts.

pub mod console;
pub mod fetcher;

pub use console::ConsoleClassifier;
pub use fetcher::HttpFetcher;
