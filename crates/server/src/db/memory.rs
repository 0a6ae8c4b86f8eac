use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Error, WeatherStore};
use crate::models::{CoordKey, MonthKey, MonthlyRecord};

/// Process-local storage backend.
///
/// Fills the interchangeable-backend slot next to [`super::SqliteStore`];
/// nothing survives a restart. Each coordinate key's records are kept sorted
/// by month so selects come back oldest first without re-sorting.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<MonthlyRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeatherStore for MemoryStore {
    async fn select(
        &self,
        coord: &CoordKey,
        month: Option<MonthKey>,
    ) -> Result<Vec<MonthlyRecord>, Error> {
        let records = self.records.read().await;
        let Some(stored) = records.get(&coord.to_string()) else {
            return Ok(Vec::new());
        };

        Ok(stored
            .iter()
            .filter(|r| month.is_none_or(|m| r.month == m))
            .cloned()
            .collect())
    }

    async fn insert(&self, records: &[MonthlyRecord]) -> Result<(), Error> {
        let mut stored = self.records.write().await;

        for record in records {
            let entry = stored.entry(record.coord.to_string()).or_default();
            if entry.iter().any(|r| r.month == record.month) {
                return Err(Error::DuplicateRecord {
                    coord: record.coord.to_string(),
                    month: record.month,
                });
            }
            entry.push(record.clone());
            entry.sort_by_key(|r| r.month);
        }

        Ok(())
    }

    async fn update(&self, record: &MonthlyRecord) -> Result<(), Error> {
        let mut stored = self.records.write().await;

        let target = stored
            .get_mut(&record.coord.to_string())
            .and_then(|entry| entry.iter_mut().find(|r| r.month == record.month))
            .ok_or_else(|| Error::RecordNotFound {
                coord: record.coord.to_string(),
                month: record.month,
            })?;

        target.max_temp = record.max_temp;
        target.min_temp = record.min_temp;
        Ok(())
    }
}
