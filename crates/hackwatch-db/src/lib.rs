mod record_ops;
mod tables;

use std::path::{Path, PathBuf};
use std::{io, result};

use redb_bincode::{ReadTransaction, WriteTransaction};
use snafu::{Location, ResultExt as _, Snafu};
use tokio::task::JoinError;
use tracing::{debug, info};

pub use self::tables::*;

const LOG_TARGET: &str = "hackwatch::db";

/// Version of the on-disk layout this code understands
const DB_VER: u64 = 1;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DbError {
    Database {
        source: redb::DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(transparent)]
    Table {
        source: redb::TableError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(transparent)]
    Storage {
        source: redb::StorageError,
        #[snafu(implicit)]
        location: Location,
    },
    Transaction {
        source: redb::TransactionError,
        #[snafu(implicit)]
        location: Location,
    },
    Commit {
        source: redb::CommitError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Database version {db_ver} is newer than supported {code_ver}"))]
    DbVersionTooHigh {
        db_ver: u64,
        code_ver: u64,
        #[snafu(implicit)]
        location: Location,
    },
    Join {
        source: JoinError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Could not create data dir {}", path.display()))]
    DataDir {
        source: io::Error,
        path: PathBuf,
        #[snafu(implicit)]
        location: Location,
    },
}
pub type DbResult<T> = result::Result<T, DbError>;

/// Persistent store of seen hackathons
///
/// A single redb file. All transactions run on the calling thread through
/// [`tokio::task::block_in_place`], so a multi-threaded runtime is required.
#[derive(Debug)]
pub struct Database {
    inner: redb_bincode::Database,
}

impl Database {
    /// Build `<data_dir>/<name>.redb`, creating `data_dir` if needed
    pub async fn mk_db_path(data_dir: &Path, name: &str) -> DbResult<PathBuf> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .context(DataDirSnafu { path: data_dir })?;
        Ok(data_dir.join(format!("{name}.redb")))
    }

    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Database> {
        let path = path.into();
        debug!(target: LOG_TARGET, path = %path.display(), "Opening database");
        let inner = tokio::task::spawn_blocking(move || redb_bincode::Database::create(path))
            .await
            .context(JoinSnafu)?
            .context(DatabaseSnafu)?;

        Self::write_with_inner(&inner, |tx| {
            Self::init_tables_tx(tx)?;
            Self::check_db_ver_tx(tx)?;
            Ok(())
        })
        .await?;

        Ok(Self { inner })
    }

    fn init_tables_tx(tx: &WriteTransaction) -> DbResult<()> {
        tx.open_table(&db_version::TABLE)?;
        tx.open_table(&prev_hackathons::TABLE)?;
        tx.open_table(&pending_notifications::TABLE)?;
        Ok(())
    }

    fn check_db_ver_tx(tx: &WriteTransaction) -> DbResult<()> {
        let mut table_db_ver = tx.open_table(&db_version::TABLE)?;

        let Some(cur_db_ver) = table_db_ver.first()?.map(|g| g.1.value()) else {
            info!(target: LOG_TARGET, "Initializing new database");
            table_db_ver.insert(&(), &DB_VER)?;
            return Ok(());
        };

        if DB_VER < cur_db_ver {
            return DbVersionTooHighSnafu {
                db_ver: cur_db_ver,
                code_ver: DB_VER,
            }
            .fail();
        }

        Ok(())
    }

    pub async fn write_with_inner<T>(
        inner: &redb_bincode::Database,
        f: impl FnOnce(&'_ WriteTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        tokio::task::block_in_place(|| {
            let dbtx = inner.begin_write().context(TransactionSnafu)?;
            let res = f(&dbtx)?;

            dbtx.commit().context(CommitSnafu)?;

            Ok(res)
        })
    }

    pub async fn write_with<T>(
        &self,
        f: impl FnOnce(&'_ WriteTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        Self::write_with_inner(&self.inner, f).await
    }

    pub async fn read_with_inner<T>(
        inner: &redb_bincode::Database,
        f: impl FnOnce(&'_ ReadTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        tokio::task::block_in_place(|| {
            let dbtx = inner.begin_read().context(TransactionSnafu)?;

            f(&dbtx)
        })
    }

    pub async fn read_with<T>(
        &self,
        f: impl FnOnce(&'_ ReadTransaction) -> DbResult<T>,
    ) -> DbResult<T> {
        Self::read_with_inner(&self.inner, f).await
    }
}
