use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use rquest_util::Emulation;
use tracing::debug;

use crate::clients::http::HttpClient;
use crate::clients::{Cookies, FetchResponse, Fetcher};
use crate::error::Result;

/// Browser profiles rotated across requests.
pub const EMULATIONS: [Emulation; 4] = [
    Emulation::Firefox136,
    Emulation::Chrome133,
    Emulation::Safari18_3,
    Emulation::Edge134,
];

pub struct ClientPool {
    clients: Vec<HttpClient>,
    current: AtomicUsize,
}

impl ClientPool {
    pub fn new() -> Result<Self> {
        debug!("Creating client pool with {} emulations", EMULATIONS.len());

        let clients = EMULATIONS.into_iter()
            .map(HttpClient::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clients,
            current: AtomicUsize::new(0),
        })
    }

    pub fn next_client(&self) -> &HttpClient {
        let current = self.current.fetch_add(1, Ordering::SeqCst);
        &self.clients[current % self.clients.len()]
    }
}

#[async_trait]
impl Fetcher for ClientPool {
    async fn fetch(&self, url: &str, cookies: &Cookies, timeout: Duration) -> Result<FetchResponse> {
        self.next_client().fetch(url, cookies, timeout).await
    }
}
