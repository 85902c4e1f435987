use std::time::Duration;
use async_trait::async_trait;
use rquest::{Client, RequestBuilder};
use rquest_util::Emulation;
use http::header::COOKIE;
use tracing::debug;

use crate::clients::{Cookies, FetchResponse, Fetcher};
use crate::error::Result;

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(emulation: Emulation) -> Result<Self> {
        debug!(
            emulation = ?emulation,
            "Creating client with emulation"
        );

        let client = Client::builder()
            .emulation(emulation)
            .build()?;

        Ok(Self { client })
    }

    pub fn get(&self, url: &str, cookies: &Cookies, timeout: Duration) -> Result<RequestBuilder> {
        let mut request = self.client.get(url).timeout(timeout);

        if let Some(header) = cookies.header()? {
            request = request.header(COOKIE, header);
        }

        debug!(
            url = url,
            cookies = cookies.len(),
            timeout_secs = timeout.as_secs(),
            "Creating GET request"
        );

        Ok(request)
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str, cookies: &Cookies, timeout: Duration) -> Result<FetchResponse> {
        let response = self.get(url, cookies, timeout)?.send().await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            url = %response.url(),
            "Response received"
        );

        let body = response.bytes().await?;
        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
