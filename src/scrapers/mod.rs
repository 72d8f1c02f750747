//! Scraping layer: page fetching, listing discovery, field extraction.

mod http_client;
mod listing;
mod tender;

pub use http_client::{with_retry, FetchError, HttpClient};
pub use listing::{pages_for, ListingCrawler};
pub use tender::extract_tender;
