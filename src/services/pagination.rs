use std::sync::LazyLock;
use std::time::Duration;
use scraper::Selector;
use tracing::{debug, info};

use crate::clients::{Cookies, Fetcher};
use crate::error::Result;
use crate::extractors::field::{Document, static_selector};

/// Links from the selling list to each listing's detail page.
pub static ITEM_LINK: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"a[data-ylk^="rsec:itm;slk:tc;"]"#));

/// The "next page" link of a paginated list.
pub static NEXT_PAGE: LazyLock<Selector> =
    LazyLock::new(|| static_selector(r#"a[data-ylk^="rsec:pagination;slk:next;"]"#));

/// Walk a paginated list from `start_url`, collecting the `href` of every
/// anchor matching `link_selector`, page after page in document order.
///
/// The walk stops at the first page without a next link. Pages are not
/// checked for cycles. Any failed page aborts the walk.
pub async fn collect_urls(
    fetcher: &dyn Fetcher,
    start_url: &str,
    cookies: &Cookies,
    link_selector: &Selector,
    timeout: Duration,
) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    let mut next = Some(start_url.to_string());
    let mut page = 0usize;

    while let Some(url) = next.take() {
        page += 1;
        let body = fetcher.fetch(&url, cookies, timeout).await?.into_success(&url)?;
        let (links, next_url) = scan_page(&body, link_selector);

        debug!(
            page = page,
            url = %url,
            links = links.len(),
            has_next = next_url.is_some(),
            "Scanned list page"
        );

        urls.extend(links);
        next = next_url;
    }

    info!(pages = page, urls = urls.len(), "Finished pagination");
    Ok(urls)
}

fn scan_page(body: &[u8], link_selector: &Selector) -> (Vec<String>, Option<String>) {
    let doc = Document::parse(body);

    let links = doc
        .select(link_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect();

    let next_url = doc
        .select(&NEXT_PAGE)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string);

    (links, next_url)
}
