use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use tokio::{
    fs::create_dir_all,
    sync::{mpsc, oneshot},
};

use super::{Error, WeatherStore};
use crate::models::{CoordKey, MonthKey, MonthlyRecord};

type WriteOperation = std::pin::Pin<Box<dyn Future<Output = ()> + Send>>;

/// Serializes all writes through a single task so concurrent syncs cannot
/// interleave their update/insert batches on the pool.
struct StoreWriter {
    write_tx: mpsc::UnboundedSender<WriteOperation>,
    _handle: tokio::task::JoinHandle<()>,
}

impl StoreWriter {
    fn new() -> Self {
        let (write_tx, mut write_rx) = mpsc::unbounded_channel::<WriteOperation>();

        let handle = tokio::spawn(async move {
            while let Some(future) = write_rx.recv().await {
                future.await;
            }
        });

        Self {
            write_tx,
            _handle: handle,
        }
    }

    async fn execute<T, F, Fut>(&self, pool: SqlitePool, operation: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(SqlitePool) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel::<Result<T, Error>>();

        let write_op = Box::pin(async move {
            let result = operation(pool).await;
            let _ = result_tx.send(result);
        });

        self.write_tx
            .send(write_op)
            .map_err(|_| Error::WriterClosed)?;

        result_rx.await.map_err(|_| Error::WriterClosed)?
    }
}

/// File-backed storage on SQLite.
pub struct SqliteStore {
    pool: SqlitePool,
    writer: StoreWriter,
}

impl SqliteStore {
    pub async fn new(data_dir: &str) -> Result<Self, Error> {
        let db_path = format!("{}/weather.sqlite", data_dir);

        if let Some(parent) = Path::new(&db_path).parent() {
            create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))?
            .create_if_missing(true)
            .pragma("journal_mode", "WAL")
            .pragma("synchronous", "NORMAL")
            .pragma("busy_timeout", "5000")
            .pragma("temp_store", "MEMORY");

        let store = Self::from_options(options).await?;
        store.health_check().await?;
        info!("SQLite store initialized at: {}", db_path);

        Ok(store)
    }

    async fn from_options(options: SqliteConnectOptions) -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            writer: StoreWriter::new(),
        })
    }

    /// Check connectivity and page integrity, used once at startup.
    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;

        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await?;
        if result != "ok" {
            return Err(Error::Query(sqlx::Error::Protocol(format!(
                "sqlite integrity check failed: {result}"
            ))));
        }

        Ok(())
    }

    #[cfg(test)]
    async fn in_memory() -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            pool,
            writer: StoreWriter::new(),
        })
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<MonthlyRecord, Error> {
    let coord_key: String = row.get("coord_key");
    let month: String = row.get("month");
    Ok(MonthlyRecord {
        coord: coord_key.parse()?,
        month: month.parse()?,
        max_temp: row.get("max_temp"),
        min_temp: row.get("min_temp"),
    })
}

fn map_insert_error(e: sqlx::Error, record: &MonthlyRecord) -> Error {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        Error::DuplicateRecord {
            coord: record.coord.to_string(),
            month: record.month,
        }
    } else {
        Error::Query(e)
    }
}

#[async_trait]
impl WeatherStore for SqliteStore {
    async fn select(
        &self,
        coord: &CoordKey,
        month: Option<MonthKey>,
    ) -> Result<Vec<MonthlyRecord>, Error> {
        let rows = match month {
            Some(month) => {
                sqlx::query(
                    "SELECT coord_key, month, max_temp, min_temp
                     FROM monthly_extremes
                     WHERE coord_key = ? AND month = ?
                     ORDER BY month ASC",
                )
                .bind(coord.to_string())
                .bind(month.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT coord_key, month, max_temp, min_temp
                     FROM monthly_extremes
                     WHERE coord_key = ?
                     ORDER BY month ASC",
                )
                .bind(coord.to_string())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_record).collect()
    }

    async fn insert(&self, records: &[MonthlyRecord]) -> Result<(), Error> {
        if records.is_empty() {
            return Ok(());
        }

        let pool = self.pool.clone();
        let records = records.to_vec();

        self.writer
            .execute(pool, move |pool| async move {
                let mut tx = pool.begin().await?;

                for record in &records {
                    sqlx::query(
                        "INSERT INTO monthly_extremes (coord_key, month, max_temp, min_temp)
                         VALUES (?, ?, ?, ?)",
                    )
                    .bind(record.coord.to_string())
                    .bind(record.month.to_string())
                    .bind(record.max_temp)
                    .bind(record.min_temp)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_insert_error(e, record))?;
                }

                tx.commit().await?;
                Ok(())
            })
            .await
    }

    async fn update(&self, record: &MonthlyRecord) -> Result<(), Error> {
        let pool = self.pool.clone();
        let record = record.clone();

        self.writer
            .execute(pool, move |pool| async move {
                let result = sqlx::query(
                    "UPDATE monthly_extremes SET max_temp = ?, min_temp = ?
                     WHERE coord_key = ? AND month = ?",
                )
                .bind(record.max_temp)
                .bind(record.min_temp)
                .bind(record.coord.to_string())
                .bind(record.month.to_string())
                .execute(&pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(Error::RecordNotFound {
                        coord: record.coord.to_string(),
                        month: record.month,
                    });
                }

                Ok(())
            })
            .await
    }
}
