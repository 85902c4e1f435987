use std::sync::Arc;
use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use auction_collect::config::Settings;
use auction_collect::{ClientPool, Cookies, ListingService, TableStore};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(
        selling_url = %settings.scraper.selling_url,
        timeout_secs = settings.scraper.timeout_secs,
        data_dir = ?settings.storage.data_dir,
        format = ?settings.storage.format,
        "Loaded settings"
    );

    let cookies = Cookies::from_file(&settings.cookies_file)
        .with_context(|| format!("reading cookies from {}", settings.cookies_file.display()))?;

    let now = Local::now().naive_local();
    info!(captured_at = %now, "Starting collection");

    let fetcher = Arc::new(ClientPool::new()?);
    let service = ListingService::new(fetcher, cookies, settings.timeout());
    let listings = service.collect(&settings.scraper.selling_url).await?;

    let store = TableStore::new(&settings.storage.data_dir, settings.storage.format);
    let path = store.path_for(now.date());
    let mut table = store.load_or_new(&path)?;

    for listing in &listings {
        table = table.append(listing, now)?;
    }

    store.save(&table, &path)?;
    info!(
        path = %path.display(),
        appended = listings.len(),
        rows = table.len(),
        "Collection complete"
    );

    Ok(())
}
