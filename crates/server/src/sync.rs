//! Brings storage up to date for a location and returns its records.

use std::sync::Arc;

use anyhow::Context;
use log::info;
use time::{macros::date, Date, OffsetDateTime};
use tokio::sync::Mutex;

use crate::aggregate::monthly_extremes;
use crate::archive::DailyArchive;
use crate::db::WeatherStore;
use crate::geocode::{Geocoder, ResolvedPlace};
use crate::models::MonthlyRecord;

/// First day of history fetched for a location stored for the first time.
pub const HISTORY_START: Date = date!(2000 - 01 - 01);

/// A successful sync: the resolved place and its full record list.
pub struct SyncedLocation {
    pub place: ResolvedPlace,
    pub records: Vec<MonthlyRecord>,
}

/// Orchestrates geocoder, archive, and storage for one lookup.
///
/// Built once at startup and shared across requests; the collaborators sit
/// behind trait objects so tests can swap them out.
pub struct SyncService {
    geocoder: Arc<dyn Geocoder>,
    archive: Arc<dyn DailyArchive>,
    store: Arc<dyn WeatherStore>,
    // Serializes the read-decide-write sequence within this process; the
    // stored data itself stays last-writer-wins across processes.
    guard: Mutex<()>,
}

impl SyncService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        archive: Arc<dyn DailyArchive>,
        store: Arc<dyn WeatherStore>,
    ) -> Self {
        Self {
            geocoder,
            archive,
            store,
            guard: Mutex::new(()),
        }
    }

    /// Resolve `query`, refresh storage for its coordinate key, and return
    /// the complete ordered record list. `Ok(None)` means the geocoder had
    /// no match; storage is untouched in that case.
    ///
    /// A location seen for the first time gets its full history since
    /// [`HISTORY_START`]. Otherwise only the most recent stored month (which
    /// may have gained days since the last sync) is refreshed in place and
    /// any newly elapsed months are appended, bounding the incremental cost.
    pub async fn sync_location(&self, query: &str) -> anyhow::Result<Option<SyncedLocation>> {
        let Some(place) = self.geocoder.lookup(query).await? else {
            return Ok(None);
        };

        let today = OffsetDateTime::now_utc().date();
        let _guard = self.guard.lock().await;

        let existing = self.store.select(&place.coord, None).await?;
        match existing.last() {
            None => {
                let samples = self
                    .archive
                    .daily_range(&place.coord, HISTORY_START, today)
                    .await?;
                let months = monthly_extremes(&place.coord, &samples);
                if !months.is_empty() {
                    info!("first sync for {}: storing {} months", place.coord, months.len());
                    self.store.insert(&months).await?;
                }
            }
            Some(anchor) => {
                let start = anchor
                    .month
                    .first_day()
                    .context("anchor month has no first day")?;
                let samples = self.archive.daily_range(&place.coord, start, today).await?;
                let mut months = monthly_extremes(&place.coord, &samples);

                // The first aggregated month is the anchor month again, now
                // possibly with more days behind it; the rest are new.
                if !months.is_empty() {
                    let refreshed = months.remove(0);
                    info!(
                        "refreshing {} for {}, appending {} new months",
                        refreshed.month,
                        place.coord,
                        months.len()
                    );
                    self.store.update(&refreshed).await?;
                    if !months.is_empty() {
                        self.store.insert(&months).await?;
                    }
                }
            }
        }

        let records = self.store.select(&place.coord, None).await?;
        Ok(Some(SyncedLocation { place, records }))
    }
}
