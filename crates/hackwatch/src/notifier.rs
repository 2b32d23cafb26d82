use hackwatch_core::HackathonRecord;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use snafu::{ResultExt as _, Snafu};
use tracing::{debug, info};
use url::Url;

use crate::LOG_TARGET;

#[derive(Debug, Snafu)]
pub enum NotifyError {
    #[snafu(display("POST to {url} failed"))]
    Http { url: Url, source: reqwest::Error },
    #[snafu(display("{url} responded with {status}"))]
    Status { url: Url, status: StatusCode },
}

pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

/// Downstream consumer of new hackathons
#[async_trait::async_trait]
pub trait Notifier {
    /// Forward a batch of new records, sent as a JSON array
    async fn notify_records(&self, records: &[HackathonRecord]) -> NotifyResult<()>;

    /// Signal a failed cycle, sent as a single JSON object
    async fn notify_bot_down(&self, notice: &HackathonRecord) -> NotifyResult<()>;
}

pub struct HttpNotifier {
    client: Client,
    endpoint: Url,
}

impl HttpNotifier {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    async fn post_json<T>(&self, body: &T) -> NotifyResult<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .context(HttpSnafu {
                url: self.endpoint.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu {
                url: self.endpoint.clone(),
                status,
            }
            .fail();
        }

        debug!(target: LOG_TARGET, url = %self.endpoint, %status, "Endpoint accepted payload");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for HttpNotifier {
    async fn notify_records(&self, records: &[HackathonRecord]) -> NotifyResult<()> {
        self.post_json(records).await?;
        info!(target: LOG_TARGET, count = records.len(), "Successfully sent new hackathons to the endpoint");
        Ok(())
    }

    async fn notify_bot_down(&self, notice: &HackathonRecord) -> NotifyResult<()> {
        self.post_json(notice).await
    }
}
