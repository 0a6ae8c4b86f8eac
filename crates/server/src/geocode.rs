//! Forward geocoding: free-text place names to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::models::CoordKey;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const REQUEST_TIMEOUT_SECS: u64 = 10;
// Nominatim's usage policy requires an identifying User-Agent
const USER_AGENT: &str = "climatrends/0.1 (https://github.com/climatrends/climatrends)";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoder returned malformed coordinates: {0}")]
    Malformed(String),
}

/// A place the geocoder resolved: the storage key plus the canonical address.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPlace {
    pub coord: CoordKey,
    pub address: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text place name. `Ok(None)` means the service has no
    /// match for the query; transport failures are errors.
    async fn lookup(&self, query: &str) -> Result<Option<ResolvedPlace>, Error>;
}

pub struct NominatimClient {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    // Nominatim serializes coordinates as strings
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimClient {
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

fn first_match(mut results: Vec<SearchResult>) -> Result<Option<ResolvedPlace>, Error> {
    if results.is_empty() {
        return Ok(None);
    }
    let result = results.remove(0);

    let latitude: f64 = result
        .lat
        .parse()
        .map_err(|_| Error::Malformed(result.lat.clone()))?;
    let longitude: f64 = result
        .lon
        .parse()
        .map_err(|_| Error::Malformed(result.lon.clone()))?;

    Ok(Some(ResolvedPlace {
        coord: CoordKey::new(latitude, longitude),
        address: result.display_name,
    }))
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn lookup(&self, query: &str) -> Result<Option<ResolvedPlace>, Error> {
        let results: Vec<SearchResult> = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let place = first_match(results)?;
        match &place {
            Some(place) => debug!("geocoded {:?} to {}", query, place.coord),
            None => debug!("no geocoder match for {:?}", query),
        }

        Ok(place)
    }
}
