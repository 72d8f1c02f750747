//! Crawl orchestration: discovery, per-tender extraction, aggregation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::export;
use crate::config::Settings;
use crate::models::TenderRecord;
use crate::scrapers::{extract_tender, HttpClient, ListingCrawler};

/// One crawl run, executable as a background job.
#[async_trait]
pub trait CrawlRunner: Send + Sync + 'static {
    /// Crawl up to `target` tenders and write the table to `output`.
    /// A `target` of zero extracts everything discovery returns.
    async fn run(&self, target: usize, output: &Path) -> anyhow::Result<PathBuf>;
}

/// The real crawl pipeline against the tender site.
pub struct CrawlService {
    settings: Settings,
    client: HttpClient,
}

impl CrawlService {
    pub fn new(settings: Settings) -> Self {
        let client = HttpClient::new(settings.request_timeout());
        Self { settings, client }
    }

    /// Fetch and extract one tender. A page that cannot be fetched
    /// yields an empty record so the run keeps its target accounting.
    async fn scrape_tender(&self, url: &str, idx: usize, total: usize) -> TenderRecord {
        info!("[{idx}/{total}] extracting tender {url}");
        match self.client.get_text_with_retry(url, &[]).await {
            Ok(html) => extract_tender(&html, url),
            Err(err) => {
                error!("[{idx}/{total}] tender {url} failed: {err}");
                TenderRecord::empty()
            }
        }
    }
}

/// Cap the discovered list at the requested target; zero means take
/// everything discovery returned.
fn truncate_to_target(mut links: Vec<String>, target: usize) -> Vec<String> {
    if target > 0 {
        links.truncate(target);
    }
    links
}

#[async_trait]
impl CrawlRunner for CrawlService {
    async fn run(&self, target: usize, output: &Path) -> anyhow::Result<PathBuf> {
        let discoverer = ListingCrawler::new(&self.client, &self.settings);
        let links = truncate_to_target(discoverer.discover(target).await, target);

        let total = links.len();
        info!("extracting {total} tenders");
        let mut records = Vec::with_capacity(total);
        for (idx, link) in links.iter().enumerate() {
            records.push(self.scrape_tender(link, idx + 1, total).await);
        }

        let empty = records.iter().filter(|r| r.is_empty()).count();
        if empty > 0 {
            warn!("{empty}/{total} tenders yielded no data");
        }

        export::write_csv(&records, output)?;
        Ok(output.to_path_buf())
    }
}
