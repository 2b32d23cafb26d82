#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use hackwatch::extractor::{Extractor, ExtractorSelectors};
use hackwatch::fetcher::{FetchError, FetchResult, Fetcher};
use hackwatch::notifier::{NotifyError, NotifyResult, Notifier};
use hackwatch::store::{RecordStore, StoreError, StoreResult};
use hackwatch::{Bot, DeliveryOrder};
use hackwatch_core::HackathonRecord;
use reqwest::StatusCode;
use tokio::sync::Mutex;
use url::Url;

pub const SOURCE_URL: &str = "https://devfolio.co/hackathons";
pub const ENDPOINT_URL: &str = "http://localhost:8000/api/hackathons";

/// One listing entry; `date: None` renders an entry without a date element
pub fn entry(title: &str, mode: &str, date: Option<&str>) -> String {
    let slug = title.to_lowercase().replace(' ', "-");
    let date = date
        .map(|d| format!(r#"<div class="hackathon-date">{d}</div>"#))
        .unwrap_or_default();
    format!(
        r#"<div class="sc-xyzabc">
             <h3 class="hackathon-title">{title}</h3>
             <a class="hackathon-link" href="https://{slug}.devfolio.co/">Apply now</a>
             <p class="hackathon-mode">{mode}</p>
             {date}
           </div>"#
    )
}

pub fn listing(entries: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Hackathons</title></head><body><section>{}</section></body></html>",
        entries.concat()
    )
}

/// What [`entry`] should extract into
pub fn record(title: &str, mode: &str, date: &str) -> HackathonRecord {
    let slug = title.to_lowercase().replace(' ', "-");
    HackathonRecord::new(title, format!("https://{slug}.devfolio.co/"), mode, date)
}

/// Serves a configurable page, or fails like an unreachable server
#[derive(Clone, Default)]
pub struct MockFetcher {
    markup: Arc<Mutex<Option<String>>>,
    pub fetches: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: Arc::new(Mutex::new(Some(markup.into()))),
            fetches: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub async fn set_markup(&self, markup: Option<String>) {
        *self.markup.lock().await = markup;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self) -> FetchResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.markup.lock().await.clone() {
            Some(markup) => Ok(markup),
            None => Err(FetchError::Status {
                url: Url::parse(SOURCE_URL).expect("valid url"),
                status: StatusCode::BAD_GATEWAY,
            }),
        }
    }
}

/// Remembers every payload, optionally refusing them
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub batches: Arc<Mutex<Vec<Vec<HackathonRecord>>>>,
    pub bot_down: Arc<Mutex<Vec<serde_json::Value>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn batches(&self) -> Vec<Vec<HackathonRecord>> {
        self.batches.lock().await.clone()
    }

    pub async fn bot_down(&self) -> Vec<serde_json::Value> {
        self.bot_down.lock().await.clone()
    }

    fn check(&self) -> NotifyResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Status {
                url: Url::parse(ENDPOINT_URL).expect("valid url"),
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_records(&self, records: &[HackathonRecord]) -> NotifyResult<()> {
        self.check()?;
        self.batches.lock().await.push(records.to_vec());
        Ok(())
    }

    async fn notify_bot_down(&self, notice: &HackathonRecord) -> NotifyResult<()> {
        self.check()?;
        self.bot_down
            .lock()
            .await
            .push(serde_json::to_value(notice).expect("serializes"));
        Ok(())
    }
}

/// In-memory [`RecordStore`] with call counters
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub records: Arc<Mutex<Vec<HackathonRecord>>>,
    pub pending: Arc<Mutex<Vec<HackathonRecord>>>,
    pub lookups: Arc<AtomicUsize>,
    pub inserts: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<HackathonRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<HackathonRecord> {
        self.records.lock().await.clone()
    }

    pub async fn titles(&self) -> Vec<String> {
        self.records().await.into_iter().map(|r| r.title).collect()
    }

    pub async fn pending_titles(&self) -> Vec<String> {
        self.pending
            .lock()
            .await
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Other {
                source: "store is offline".into(),
            });
        }
        Ok(())
    }

    async fn insert_new(&self, records: &[HackathonRecord]) -> Vec<HackathonRecord> {
        let mut stored = self.records.lock().await;
        let mut added = Vec::new();
        for record in records {
            if !stored.iter().any(|r| r.title == record.title) {
                stored.push(record.clone());
                added.push(record.clone());
            }
        }
        added
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn contains_title(&self, title: &str) -> StoreResult<bool> {
        self.check()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().await.iter().any(|r| r.title == title))
    }

    async fn insert_many(&self, records: &[HackathonRecord]) -> StoreResult<usize> {
        self.check()?;
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(self.insert_new(records).await.len())
    }

    async fn insert_many_and_queue(&self, records: &[HackathonRecord]) -> StoreResult<usize> {
        self.check()?;
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let added = self.insert_new(records).await;
        let count = added.len();
        self.pending.lock().await.extend(added);
        Ok(count)
    }

    async fn pending(&self) -> StoreResult<Vec<HackathonRecord>> {
        self.check()?;
        Ok(self.pending.lock().await.clone())
    }

    async fn clear_pending(&self, titles: &[String]) -> StoreResult<()> {
        self.check()?;
        self.pending
            .lock()
            .await
            .retain(|r| !titles.contains(&r.title));
        Ok(())
    }
}

pub fn default_extractor() -> Extractor {
    Extractor::new(&ExtractorSelectors::default())
        .expect("default selectors parse")
        .with_base_url(Url::parse(SOURCE_URL).expect("valid url"))
}

pub fn make_bot(
    fetcher: &MockFetcher,
    store: Box<dyn RecordStore + Send + Sync>,
    notifier: &RecordingNotifier,
    delivery_order: DeliveryOrder,
) -> Bot {
    Bot::builder()
        .fetcher(Box::new(fetcher.clone()))
        .extractor(default_extractor())
        .store(store)
        .notifier(Box::new(notifier.clone()))
        .delivery_order(delivery_order)
        .build()
}
