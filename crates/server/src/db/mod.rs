use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{CoordKey, MonthKey, MonthlyRecord, ParseError};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("stored value failed to parse: {0}")]
    Corrupt(#[from] ParseError),
    #[error("record already stored for {coord} {month}")]
    DuplicateRecord { coord: String, month: MonthKey },
    #[error("no record to update for {coord} {month}")]
    RecordNotFound { coord: String, month: MonthKey },
    #[error("store writer channel closed")]
    WriterClosed,
    #[error("failed to create data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Storage contract shared by all backends.
///
/// Records live under their coordinate key and are returned oldest month
/// first; callers rely on `last()` being the most recent month.
#[async_trait]
pub trait WeatherStore: Send + Sync {
    /// All records for the coordinate key, ordered by month ascending.
    /// A `month` narrows the result to that single month.
    async fn select(
        &self,
        coord: &CoordKey,
        month: Option<MonthKey>,
    ) -> Result<Vec<MonthlyRecord>, Error>;

    /// Append a batch of new records. A record whose `(coord, month)` is
    /// already stored is rejected with [`Error::DuplicateRecord`].
    async fn insert(&self, records: &[MonthlyRecord]) -> Result<(), Error>;

    /// Replace the max/min of the stored record matching `(coord, month)`.
    /// The target must already exist; otherwise [`Error::RecordNotFound`].
    async fn update(&self, record: &MonthlyRecord) -> Result<(), Error>;
}

/// Storage backend selected at process startup via configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => Ok(Backend::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Build the configured storage backend.
pub async fn connect(backend: Backend, data_dir: &str) -> Result<Arc<dyn WeatherStore>, Error> {
    match backend {
        Backend::Sqlite => Ok(Arc::new(SqliteStore::new(data_dir).await?)),
        Backend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
