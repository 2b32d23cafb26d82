pub mod cycle;
pub mod dedup;
pub mod extractor;
pub mod fetcher;
pub mod notifier;
pub mod store;

use std::future::Future;
use std::time::Duration;

use tracing::info;

pub use crate::cycle::{CycleError, CycleOutcome, CycleReport, CycleResult, DeliveryOrder};
use crate::extractor::Extractor;
use crate::fetcher::Fetcher;
use crate::notifier::Notifier;
use crate::store::RecordStore;

pub const PROJECT_NAME: &str = "hackwatch";
pub const LOG_TARGET: &str = "hackwatch::bot";

pub const DEFAULT_SOURCE_URL: &str = "https://devfolio.co/hackathons";
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000/api/hackathons";
pub const DEFAULT_DATABASE_NAME: &str = "hackathons_db";
pub const DEFAULT_INTERVAL_SECS: u64 = 600;

const USER_AGENT: &str = concat!("hackwatch/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for fetching and notifying
///
/// Without `timeout` requests are only bounded by the transport defaults.
pub fn build_http_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// The scraping bot: one source, one extractor, one store, one endpoint
#[derive(bon::Builder)]
pub struct Bot {
    fetcher: Box<dyn Fetcher + Send + Sync>,
    extractor: Extractor,
    store: Box<dyn RecordStore + Send + Sync>,
    notifier: Box<dyn Notifier + Send + Sync>,
    #[builder(default)]
    delivery_order: DeliveryOrder,
}

impl Bot {
    pub fn delivery_order(&self) -> DeliveryOrder {
        self.delivery_order
    }

    /// Run cycles until `shutdown` resolves
    ///
    /// The first cycle starts right away, each following one `interval`
    /// after the previous one finished. `shutdown` is only honored while
    /// sleeping between cycles; a started cycle always runs to completion.
    pub async fn run(&self, interval: Duration, shutdown: impl Future<Output = ()>) {
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            self.run_cycle_guarded().await;

            info!(
                target: LOG_TARGET,
                next_run_in_secs = interval.as_secs(),
                "Waiting for next run"
            );

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    info!(target: LOG_TARGET, "Shutdown requested, stopping");
                    return;
                }
            }
        }
    }
}
