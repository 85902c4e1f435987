pub mod cookies;
pub mod pool;
pub mod http;

pub use cookies::Cookies;
pub use pool::ClientPool;
pub use http::HttpClient;

use std::time::Duration;
use async_trait::async_trait;
use ::http::StatusCode;

use crate::error::{Error, Result};

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// The body, or a transport error if the status is not 2xx.
    pub fn into_success(self, url: &str) -> Result<Vec<u8>> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            Err(Error::Status { url: url.to_string(), status: self.status })
        }
    }
}

/// Fetch a page with the seller's session cookies.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, cookies: &Cookies, timeout: Duration) -> Result<FetchResponse>;
}
