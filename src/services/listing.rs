use std::sync::Arc;
use std::time::{Duration, Instant};
use scraper::Selector;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::clients::{Cookies, Fetcher};
use crate::error::Result;
use crate::extractors::{Extractor, ListingExtractor};
use crate::models::ListingSnapshot;
use crate::services::pagination::{self, ITEM_LINK};

/// Discovers a seller's listings and scrapes each detail page.
#[derive(Clone)]
pub struct ListingService {
    fetcher: Arc<dyn Fetcher>,
    cookies: Arc<Cookies>,
    timeout: Duration,
}

impl ListingService {
    pub fn new(fetcher: Arc<dyn Fetcher>, cookies: Cookies, timeout: Duration) -> Self {
        Self {
            fetcher,
            cookies: Arc::new(cookies),
            timeout,
        }
    }

    pub async fn collect_urls(&self, start_url: &str, link_selector: &Selector) -> Result<Vec<String>> {
        pagination::collect_urls(
            self.fetcher.as_ref(),
            start_url,
            &self.cookies,
            link_selector,
            self.timeout,
        )
        .await
    }

    /// Detail URLs of every listing on the selling list.
    pub async fn collect_selling_urls(&self, selling_url: &str) -> Result<Vec<String>> {
        self.collect_urls(selling_url, &ITEM_LINK).await
    }

    /// Fetch and extract every URL concurrently.
    ///
    /// Failed fetches and undecodable pages are logged and skipped, as are
    /// pages without an auction ID. Output order is completion order.
    pub async fn fetch_all(&self, urls: Vec<String>) -> Vec<ListingSnapshot> {
        let mut tasks = JoinSet::new();

        for url in urls {
            let fetcher = Arc::clone(&self.fetcher);
            let cookies = Arc::clone(&self.cookies);
            let timeout = self.timeout;
            tasks.spawn(async move {
                let result = fetch_listing(fetcher.as_ref(), &url, &cookies, timeout).await;
                (url, result)
            });
        }

        let mut listings = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, Ok(snapshot))) => {
                    if snapshot.auction_id.is_empty() {
                        debug!(url = %url, "Dropping listing without auction ID");
                        continue;
                    }
                    listings.push(snapshot);
                }
                Ok((url, Err(e))) => {
                    error!(
                        error = %e,
                        url = %url,
                        "Failed to fetch listing"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Listing task did not complete");
                }
            }
        }

        listings
    }

    /// Scrape every listing currently on the selling list.
    pub async fn collect(&self, selling_url: &str) -> Result<Vec<ListingSnapshot>> {
        let start = Instant::now();

        let urls = self.collect_selling_urls(selling_url).await?;
        info!(count = urls.len(), "Listings are selling");

        let listings = self.fetch_all(urls).await;
        info!(
            listings = listings.len(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Collected listings"
        );

        Ok(listings)
    }
}

async fn fetch_listing(
    fetcher: &dyn Fetcher,
    url: &str,
    cookies: &Cookies,
    timeout: Duration,
) -> Result<ListingSnapshot> {
    let body = fetcher.fetch(url, cookies, timeout).await?.into_success(url)?;
    ListingExtractor.extract(&body)
}
