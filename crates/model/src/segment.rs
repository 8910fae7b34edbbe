use std::{error, fmt};

use chrono::{DateTime, NaiveDate};
use utility::geo;

use crate::country::CountryCode;

/// Position stored as E7 fixed-point degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub latitude_e7: i64,
    pub longitude_e7: i64,
}

impl Coordinate {
    pub fn new(latitude_e7: i64, longitude_e7: i64) -> Self {
        Self {
            latitude_e7,
            longitude_e7,
        }
    }

    pub fn latitude(&self) -> f64 {
        geo::e7_to_degrees(self.latitude_e7)
    }

    pub fn longitude(&self) -> f64 {
        geo::e7_to_degrees(self.longitude_e7)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat: {:.6}, lng: {:.6}", self.latitude(), self.longitude())
    }
}

/// One recorded movement, as extracted from a location history export.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
    pub distance_meters: u64,
    /// RFC 3339 timestamp with offset, kept verbatim so that parse failures
    /// can be reported per segment.
    pub start_timestamp: String,
}

impl Segment {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }

    /// Calendar date of the start timestamp in the timestamp's own offset.
    pub fn start_date(&self) -> Result<NaiveDate, TimestampError> {
        DateTime::parse_from_rfc3339(&self.start_timestamp)
            .map(|timestamp| timestamp.date_naive())
            .map_err(|why| TimestampError {
                timestamp: self.start_timestamp.clone(),
                reason: why.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampError {
    pub timestamp: String,
    pub reason: String,
}

impl error::Error for TimestampError {}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not parse start timestamp '{}': {}",
            self.timestamp, self.reason
        )
    }
}

/// A segment attributed to the country of its start location.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSegment {
    pub segment: Segment,
    pub country: CountryCode,
    pub date: NaiveDate,
}

impl ResolvedSegment {
    pub fn new(segment: Segment, country: CountryCode) -> Result<Self, TimestampError> {
        let date = segment.start_date()?;
        Ok(Self {
            segment,
            country,
            date,
        })
    }

    pub fn distance_km(&self) -> f64 {
        self.segment.distance_km()
    }
}
