//! Service layer for tenderwatch business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI, the web server, or other interfaces.

pub mod crawl;
pub mod export;

pub use crawl::{CrawlRunner, CrawlService};
pub use export::{read_csv, write_csv, ExportError};
