//! Historical daily temperatures from the Open-Meteo ERA5 archive.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::models::{CoordKey, DailySample};

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/era5";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";
// Fixed bucket timezone and unit for every lookup
const BUCKET_TIMEZONE: &str = "America/Los_Angeles";
const TEMPERATURE_UNIT: &str = "fahrenheit";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("archive request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to format date for archive query: {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("failed to parse date in archive response: {0}")]
    TimeParse(#[from] time::error::Parse),
}

#[async_trait]
pub trait DailyArchive: Send + Sync {
    /// Daily max/min samples for the inclusive date range, ascending by date,
    /// with no-data days already filtered out.
    async fn daily_range(
        &self,
        coord: &CoordKey,
        start: Date,
        end: Date,
    ) -> Result<Vec<DailySample>, Error>;
}

pub struct OpenMeteoClient {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: DailyBlock,
}

/// The archive returns three parallel arrays under `daily`; readings are
/// null for days it has no data for.
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }
}

/// Zip the parallel arrays into samples, dropping any day with a null
/// reading. A null max is the archive's "no data that day" marker; a null
/// min next to a present max is dropped too rather than invented.
fn filter_daily(block: DailyBlock) -> Result<Vec<DailySample>, Error> {
    let DailyBlock {
        time,
        temperature_2m_max,
        temperature_2m_min,
    } = block;

    let mut samples = Vec::with_capacity(time.len());
    for ((date, max_temp), min_temp) in time
        .iter()
        .zip(temperature_2m_max)
        .zip(temperature_2m_min)
    {
        let (Some(max_temp), Some(min_temp)) = (max_temp, min_temp) else {
            continue;
        };
        samples.push(DailySample {
            date: Date::parse(date, DATE_FORMAT)?,
            max_temp,
            min_temp,
        });
    }

    Ok(samples)
}

#[async_trait]
impl DailyArchive for OpenMeteoClient {
    async fn daily_range(
        &self,
        coord: &CoordKey,
        start: Date,
        end: Date,
    ) -> Result<Vec<DailySample>, Error> {
        let response: ArchiveResponse = self
            .client
            .get(ARCHIVE_URL)
            .query(&[
                ("latitude", coord.latitude.to_string()),
                ("longitude", coord.longitude.to_string()),
                ("start_date", start.format(DATE_FORMAT)?),
                ("end_date", end.format(DATE_FORMAT)?),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", BUCKET_TIMEZONE.to_string()),
                ("temperature_unit", TEMPERATURE_UNIT.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let samples = filter_daily(response.daily)?;
        debug!(
            "archive returned {} usable days for {} in [{start}, {end}]",
            samples.len(),
            coord
        );

        Ok(samples)
    }
}
