use redb_bincode::ReadableTable as _;
use tracing::{debug, info};

use crate::{
    Database, DbResult, HackathonRecord, LOG_TARGET, pending_notifications, prev_hackathons,
};

impl Database {
    pub fn contains_title_tx(
        title: &str,
        prev_hackathons_table: &impl prev_hackathons::ReadableTable,
    ) -> DbResult<bool> {
        Ok(prev_hackathons_table.get(&title.to_owned())?.is_some())
    }

    /// Insert records that are not stored yet, returns how many were added
    ///
    /// Existing titles are left untouched.
    pub fn insert_records_tx(
        records: &[HackathonRecord],
        prev_hackathons_table: &mut prev_hackathons::Table,
    ) -> DbResult<usize> {
        let mut added = 0;
        for record in records {
            if Self::contains_title_tx(&record.title, &*prev_hackathons_table)? {
                debug!(target: LOG_TARGET, title = %record.title, "Hackathon already stored, skipping");
                continue;
            }
            prev_hackathons_table.insert(&record.title, record)?;
            added += 1;
        }
        Ok(added)
    }

    pub async fn contains_title(&self, title: &str) -> DbResult<bool> {
        self.read_with(|tx| {
            let prev_hackathons_table = tx.open_table(&prev_hackathons::TABLE)?;
            Self::contains_title_tx(title, &prev_hackathons_table)
        })
        .await
    }

    /// Bulk insert in a single write transaction
    pub async fn insert_records(&self, records: &[HackathonRecord]) -> DbResult<usize> {
        let added = self
            .write_with(|tx| {
                let mut prev_hackathons_table = tx.open_table(&prev_hackathons::TABLE)?;
                Self::insert_records_tx(records, &mut prev_hackathons_table)
            })
            .await?;
        info!(target: LOG_TARGET, added, "Stored hackathons");
        Ok(added)
    }

    /// Store records and queue them for delivery, atomically
    pub async fn insert_records_and_queue(&self, records: &[HackathonRecord]) -> DbResult<usize> {
        let added = self
            .write_with(|tx| {
                let mut prev_hackathons_table = tx.open_table(&prev_hackathons::TABLE)?;
                let mut pending_table = tx.open_table(&pending_notifications::TABLE)?;

                for record in records {
                    if !Self::contains_title_tx(&record.title, &prev_hackathons_table)? {
                        pending_table.insert(&record.title, record)?;
                    }
                }
                Self::insert_records_tx(records, &mut prev_hackathons_table)
            })
            .await?;
        info!(target: LOG_TARGET, added, "Stored and queued hackathons");
        Ok(added)
    }

    pub async fn pending_records(&self) -> DbResult<Vec<HackathonRecord>> {
        self.read_with(|tx| {
            let pending_table = tx.open_table(&pending_notifications::TABLE)?;
            let mut records = Vec::new();
            for result in pending_table.range::<String>(..)? {
                let (_key, value) = result?;
                records.push(value.value());
            }
            Ok(records)
        })
        .await
    }

    pub async fn clear_pending(&self, titles: &[String]) -> DbResult<()> {
        self.write_with(|tx| {
            let mut pending_table = tx.open_table(&pending_notifications::TABLE)?;
            for title in titles {
                pending_table.remove(title)?;
            }
            Ok(())
        })
        .await
    }

    pub async fn list_records(&self) -> DbResult<Vec<HackathonRecord>> {
        self.read_with(|tx| {
            let prev_hackathons_table = tx.open_table(&prev_hackathons::TABLE)?;
            let mut records = Vec::new();
            for result in prev_hackathons_table.range::<String>(..)? {
                let (_key, value) = result?;
                records.push(value.value());
            }
            Ok(records)
        })
        .await
    }

    pub async fn count_records(&self) -> DbResult<usize> {
        self.read_with(|tx| {
            let prev_hackathons_table = tx.open_table(&prev_hackathons::TABLE)?;
            let mut count = 0;
            for _ in prev_hackathons_table.range::<String>(..)? {
                count += 1;
            }
            Ok(count)
        })
        .await
    }
}
