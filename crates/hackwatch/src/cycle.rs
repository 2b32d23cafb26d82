use hackwatch_core::HackathonRecord;
use hackwatch_util_error::FmtCompact as _;
use snafu::{ResultExt as _, Snafu};
use time::OffsetDateTime;
use tracing::{error, info};

use crate::fetcher::{FetchError, FetchResult};
use crate::store::StoreError;
use crate::{Bot, LOG_TARGET, dedup};

/// What to do first with new records: tell the endpoint, or store them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DeliveryOrder {
    /// POST first, store only after the endpoint accepted them
    ///
    /// While the endpoint is down the same records are re-sent every
    /// cycle, and they are not stored until a POST succeeds.
    #[default]
    NotifyFirst,
    /// Store first and queue for delivery; the queue is retried every
    /// cycle until the endpoint accepts it
    PersistFirst,
}

#[derive(Debug, Snafu)]
pub enum CycleError {
    #[snafu(display("Fetching hackathon listing failed"))]
    Fetch { source: FetchError },
    #[snafu(display("Record store failed"))]
    Store { source: StoreError },
}

pub type CycleResult<T> = std::result::Result<T, CycleError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Candidates extracted from the page
    pub scraped: usize,
    /// Candidates that passed validation and dedup
    pub new: usize,
    /// Records accepted by the endpoint
    pub notified: usize,
    /// Records added to the store
    pub persisted: usize,
    pub notify_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Failed { bot_down_notified: bool },
}

impl Bot {
    /// Fetch the listing page and extract candidate records
    pub async fn scrape(&self) -> FetchResult<Vec<HackathonRecord>> {
        let markup = self.fetcher.fetch().await?;
        Ok(self.extractor.extract(&markup))
    }

    /// One fetch → parse → filter → notify → persist pass
    pub async fn run_one_cycle(&self) -> CycleResult<CycleReport> {
        info!(target: LOG_TARGET, "Starting scraping cycle");

        let candidates = self.scrape().await.context(FetchSnafu)?;
        let mut report = CycleReport {
            scraped: candidates.len(),
            ..CycleReport::default()
        };
        info!(target: LOG_TARGET, count = report.scraped, "Scraped hackathons");

        let new_records = dedup::filter_new(candidates, self.store.as_ref())
            .await
            .context(StoreSnafu)?;
        report.new = new_records.len();

        if new_records.is_empty() {
            info!(target: LOG_TARGET, "No new updates");
        } else {
            let titles: Vec<&str> = new_records.iter().map(|r| r.title.as_str()).collect();
            info!(target: LOG_TARGET, count = report.new, ?titles, "New hackathons found");
        }

        match self.delivery_order {
            DeliveryOrder::NotifyFirst => {
                self.deliver_notify_first(&new_records, &mut report).await?
            }
            DeliveryOrder::PersistFirst => {
                self.deliver_persist_first(&new_records, &mut report).await?
            }
        }

        Ok(report)
    }

    async fn deliver_notify_first(
        &self,
        new_records: &[HackathonRecord],
        report: &mut CycleReport,
    ) -> CycleResult<()> {
        if new_records.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.notifier.notify_records(new_records).await {
            error!(
                target: LOG_TARGET,
                error = %err.fmt_compact(),
                count = new_records.len(),
                "Error sending hackathons to the endpoint, not storing them this cycle"
            );
            report.notify_failed = true;
            return Ok(());
        }
        report.notified = new_records.len();

        report.persisted = self
            .store
            .insert_many(new_records)
            .await
            .context(StoreSnafu)?;
        Ok(())
    }

    async fn deliver_persist_first(
        &self,
        new_records: &[HackathonRecord],
        report: &mut CycleReport,
    ) -> CycleResult<()> {
        if !new_records.is_empty() {
            report.persisted = self
                .store
                .insert_many_and_queue(new_records)
                .await
                .context(StoreSnafu)?;
        }

        let pending = self.store.pending().await.context(StoreSnafu)?;
        if pending.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.notifier.notify_records(&pending).await {
            error!(
                target: LOG_TARGET,
                error = %err.fmt_compact(),
                count = pending.len(),
                "Error sending hackathons to the endpoint, keeping them queued"
            );
            report.notify_failed = true;
            return Ok(());
        }
        report.notified = pending.len();

        let titles: Vec<String> = pending.into_iter().map(|r| r.title).collect();
        self.store.clear_pending(&titles).await.context(StoreSnafu)?;
        Ok(())
    }

    /// Run a cycle, sending the "Bot Down" notice if it fails
    ///
    /// Never fails itself: every error ends up in the log.
    pub async fn run_cycle_guarded(&self) -> CycleOutcome {
        match self.run_one_cycle().await {
            Ok(report) => {
                info!(
                    target: LOG_TARGET,
                    scraped = report.scraped,
                    new = report.new,
                    notified = report.notified,
                    persisted = report.persisted,
                    notify_failed = report.notify_failed,
                    "Cycle complete"
                );
                CycleOutcome::Completed(report)
            }
            Err(err) => {
                error!(target: LOG_TARGET, error = %err.fmt_compact(), "Cycle failed");
                CycleOutcome::Failed {
                    bot_down_notified: self.send_bot_down_notice().await,
                }
            }
        }
    }

    /// Returns whether the endpoint accepted the notice
    pub async fn send_bot_down_notice(&self) -> bool {
        let notice = match HackathonRecord::bot_down_notice(OffsetDateTime::now_utc()) {
            Ok(notice) => notice,
            Err(err) => {
                error!(target: LOG_TARGET, error = %err.fmt_compact(), "Could not build bot down notice");
                return false;
            }
        };

        match self.notifier.notify_bot_down(&notice).await {
            Ok(()) => {
                info!(target: LOG_TARGET, date = %notice.date, "Successfully sent notice to the endpoint");
                true
            }
            Err(err) => {
                error!(target: LOG_TARGET, error = %err.fmt_compact(), "Error sending notice to the endpoint");
                false
            }
        }
    }
}
