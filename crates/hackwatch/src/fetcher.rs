use reqwest::{Client, StatusCode};
use snafu::{ResultExt as _, Snafu};
use tracing::debug;
use url::Url;

use crate::LOG_TARGET;

#[derive(Debug, Snafu)]
pub enum FetchError {
    #[snafu(display("HTTP request to {url} failed"))]
    Http { url: Url, source: reqwest::Error },
    #[snafu(display("{url} responded with {status}"))]
    Status { url: Url, status: StatusCode },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Source of the listing page markup
#[async_trait::async_trait]
pub trait Fetcher {
    async fn fetch(&self) -> FetchResult<String>;
}

/// Fetches one fixed URL over HTTP
///
/// No retries: a failed fetch fails the whole cycle.
pub struct HttpFetcher {
    client: Client,
    url: Url,
}

impl HttpFetcher {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> FetchResult<String> {
        debug!(target: LOG_TARGET, url = %self.url, "Fetching listing page");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context(HttpSnafu {
                url: self.url.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu {
                url: self.url.clone(),
                status,
            }
            .fail();
        }

        let body = response.text().await.context(HttpSnafu {
            url: self.url.clone(),
        })?;

        debug!(target: LOG_TARGET, url = %self.url, len = body.len(), "Fetched listing page");
        Ok(body)
    }
}
