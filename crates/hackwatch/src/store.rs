use hackwatch_core::HackathonRecord;
use hackwatch_db::{Database, DbError};
use hackwatch_util_error::BoxedError;
use snafu::{ResultExt as _, Snafu};

#[derive(Debug, Snafu)]
pub enum StoreError {
    #[snafu(display("Database error"))]
    Db { source: DbError },
    #[snafu(display("Record store error"))]
    Other { source: BoxedError },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistent, append-only collection of seen hackathons
///
/// Passed into the bot explicitly, so tests can swap in an in-memory one.
#[async_trait::async_trait]
pub trait RecordStore {
    async fn contains_title(&self, title: &str) -> StoreResult<bool>;

    /// Bulk insert; titles already present are left alone
    ///
    /// Returns the number of records actually added.
    async fn insert_many(&self, records: &[HackathonRecord]) -> StoreResult<usize>;

    /// Like [`Self::insert_many`], additionally queueing the newly added
    /// records for delivery, in one atomic step
    async fn insert_many_and_queue(&self, records: &[HackathonRecord]) -> StoreResult<usize>;

    /// Records queued for delivery that were not delivered yet
    async fn pending(&self) -> StoreResult<Vec<HackathonRecord>>;

    async fn clear_pending(&self, titles: &[String]) -> StoreResult<()>;
}

#[async_trait::async_trait]
impl RecordStore for Database {
    async fn contains_title(&self, title: &str) -> StoreResult<bool> {
        Database::contains_title(self, title).await.context(DbSnafu)
    }

    async fn insert_many(&self, records: &[HackathonRecord]) -> StoreResult<usize> {
        self.insert_records(records).await.context(DbSnafu)
    }

    async fn insert_many_and_queue(&self, records: &[HackathonRecord]) -> StoreResult<usize> {
        self.insert_records_and_queue(records).await.context(DbSnafu)
    }

    async fn pending(&self) -> StoreResult<Vec<HackathonRecord>> {
        self.pending_records().await.context(DbSnafu)
    }

    async fn clear_pending(&self, titles: &[String]) -> StoreResult<()> {
        Database::clear_pending(self, titles).await.context(DbSnafu)
    }
}
