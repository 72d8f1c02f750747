//! Listing-page discovery: walks the paginated search and collects
//! detail-page links.

use scraper::{Html, Selector};
use tracing::{error, info, warn};
use url::Url;

use super::HttpClient;
use crate::config::{Settings, LISTING_PAGE_SIZE};

/// Listing pages that must be scanned to cover `target` tenders.
pub fn pages_for(target: usize) -> usize {
    target.div_ceil(LISTING_PAGE_SIZE)
}

/// Walks the search listing page by page.
pub struct ListingCrawler<'a> {
    client: &'a HttpClient,
    settings: &'a Settings,
}

impl<'a> ListingCrawler<'a> {
    pub fn new(client: &'a HttpClient, settings: &'a Settings) -> Self {
        Self { client, settings }
    }

    /// Scan listing pages `1..=pages_for(target)` in order and
    /// accumulate detail links, page order and within-page order
    /// preserved, no deduplication. A page whose fetch fails terminally
    /// is skipped; the scan always covers every remaining page. The
    /// returned list is not truncated to `target`.
    pub async fn discover(&self, target: usize) -> Vec<String> {
        let pages = pages_for(target);
        let listing_url = self.settings.listing_url();
        let mut links: Vec<String> = Vec::new();

        for page in 1..=pages {
            info!("[{page}/{pages}] fetching listing page {page}");
            let query = [("page", page.to_string())];
            let html = match self.client.get_text_with_retry(&listing_url, &query).await {
                Ok(html) => html,
                Err(err) => {
                    error!("[{page}/{pages}] listing page {page} failed: {err}");
                    continue;
                }
            };

            match extract_listing_links(&html, &self.settings.base_url) {
                Some(found) => {
                    let count = found.len();
                    links.extend(found);
                    info!(
                        "[{page}/{pages}] {count} links on page, {} accumulated",
                        links.len()
                    );
                }
                None => {
                    warn!("[{page}/{pages}] no listing table on page {page}");
                }
            }
        }

        info!("discovered {} links in total", links.len());
        links
    }
}

/// Pull detail links out of one listing page, in document order.
/// `None` when the result table is missing entirely.
fn extract_listing_links(html: &str, base_url: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("div.table-body").unwrap();
    let body = document.select(&table_sel).next()?;

    let link_sel =
        Selector::parse("a.description.tender-info__description.tender-info__link").unwrap();
    let mut links = Vec::new();
    for anchor in body.select(&link_sel) {
        match anchor.value().attr("href") {
            Some(href) if !href.is_empty() => links.push(resolve_url(base_url, href)),
            _ => {}
        }
    }
    Some(links)
}

/// Resolve a href to a full URL, handling absolute and relative forms.
fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        Url::parse(base_url)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{base_url}/{href}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::{Html as HtmlResponse, IntoResponse};
    use axum::routing::get;
    use axum::Router;

    /// Listing fixture where page 1 is permanently down.
    async fn flaky_listing(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
        match params.get("page").map(String::as_str) {
            Some("1") => (StatusCode::INTERNAL_SERVER_ERROR, "down").into_response(),
            _ => HtmlResponse(
                "<div class=\"table-body\">\
                 <a class=\"description tender-info__description tender-info__link\" \
                    href=\"/tender/42\">Поставка</a>\
                 </div>",
            )
            .into_response(),
        }
    }

    #[tokio::test]
    async fn a_failed_listing_page_is_skipped_not_fatal() {
        let app = Router::new().route("/extsearch", get(flaky_listing));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let settings = Settings {
            base_url: format!("http://{addr}"),
            ..Default::default()
        };
        let client = HttpClient::new(Duration::from_secs(5)).with_retry_delay(Duration::ZERO);
        let crawler = ListingCrawler::new(&client, &settings);

        // Target 25 spans two pages; page 1 exhausts its retries.
        let links = crawler.discover(25).await;
        assert_eq!(links, vec![format!("http://{addr}/tender/42")]);
    }

    #[test]
    fn pages_scale_with_the_listing_page_size() {
        assert_eq!(pages_for(0), 0);
        assert_eq!(pages_for(1), 1);
        assert_eq!(pages_for(20), 1);
        assert_eq!(pages_for(21), 2);
        assert_eq!(pages_for(25), 2);
        assert_eq!(pages_for(100), 5);
    }

    #[test]
    fn links_come_out_in_document_order() {
        let html = r#"
            <html><body>
            <div class="table-body">
              <a class="description tender-info__description tender-info__link"
                 href="/tender/111">Первый</a>
              <a class="description tender-info__description tender-info__link"
                 href="https://rostender.info/tender/222">Второй</a>
              <a class="other-link" href="/tender/999">мимо</a>
            </div>
            </body></html>
        "#;
        let links = extract_listing_links(html, "https://rostender.info").unwrap();
        assert_eq!(
            links,
            vec![
                "https://rostender.info/tender/111".to_string(),
                "https://rostender.info/tender/222".to_string(),
            ]
        );
    }

    #[test]
    fn missing_table_is_distinct_from_an_empty_one() {
        assert!(extract_listing_links("<html><body></body></html>", "https://x").is_none());
        let empty = extract_listing_links(
            "<html><body><div class=\"table-body\"></div></body></html>",
            "https://x",
        );
        assert_eq!(empty, Some(vec![]));
    }

    #[test]
    fn duplicate_hrefs_are_kept() {
        let html = r#"
            <div class="table-body">
              <a class="description tender-info__description tender-info__link" href="/t/1">a</a>
              <a class="description tender-info__description tender-info__link" href="/t/1">b</a>
            </div>
        "#;
        let links = extract_listing_links(html, "https://rostender.info").unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn hrefs_resolve_against_the_site_root() {
        assert_eq!(
            resolve_url("https://rostender.info", "/tender/5"),
            "https://rostender.info/tender/5"
        );
        assert_eq!(
            resolve_url("https://rostender.info", "https://other.site/x"),
            "https://other.site/x"
        );
    }
}
