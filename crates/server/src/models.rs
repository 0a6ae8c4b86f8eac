use std::fmt;
use std::str::FromStr;
use time::{Date, Month};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("invalid coordinate key: {0}")]
    Coord(String),
    #[error("invalid month key: {0}")]
    Month(String),
}

/// Latitude/longitude pair identifying a location.
///
/// The `"lat,long"` string form is the partition key for all stored records.
/// Two geocoder lookups of the same place are treated as returning the same
/// key; that approximation holds in practice and is not enforced here.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordKey {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for CoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for CoordKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, long) = s.split_once(',').ok_or_else(|| ParseError::Coord(s.into()))?;
        Ok(Self {
            latitude: lat.trim().parse().map_err(|_| ParseError::Coord(s.into()))?,
            longitude: long
                .trim()
                .parse()
                .map_err(|_| ParseError::Coord(s.into()))?,
        })
    }
}

/// Calendar month identifier (year + month, no day).
///
/// The `"YYYY-MM"` string form sorts lexicographically in chronological
/// order, so stored records ordered by this column come back oldest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: Month,
}

impl MonthKey {
    /// First day of this month, the start of an incremental fetch range.
    pub fn first_day(&self) -> Result<Date, time::error::ComponentRange> {
        Date::from_calendar_date(self.year, self.month, 1)
    }
}

impl From<Date> for MonthKey {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl FromStr for MonthKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or_else(|| ParseError::Month(s.into()))?;
        let year: i32 = year.parse().map_err(|_| ParseError::Month(s.into()))?;
        let month: u8 = month.parse().map_err(|_| ParseError::Month(s.into()))?;
        let month = Month::try_from(month).map_err(|_| ParseError::Month(s.into()))?;
        Ok(Self { year, month })
    }
}

/// One day's temperature extremes from the weather archive.
///
/// Days the archive had no max reading for are filtered out before this
/// struct is built.
#[derive(Clone, Debug, PartialEq)]
pub struct DailySample {
    pub date: Date,
    pub max_temp: f64,
    pub min_temp: f64,
}

/// Persisted monthly temperature extremes for a coordinate key.
///
/// At most one record exists per `(coord, month)`. Lists for one coordinate
/// are ordered by month ascending; the last element is the most recent month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyRecord {
    pub coord: CoordKey,
    pub month: MonthKey,
    pub max_temp: f64,
    pub min_temp: f64,
}
