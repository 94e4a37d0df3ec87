use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire format for venue opening and closing times
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// A physical venue with its reach and opening hours
///
/// Venues are immutable once built; the catalog is only ever replaced as a
/// whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum reachable distance in kilometers
    pub availability_radius: u32,
    #[serde(with = "time_of_day")]
    pub open_hour: NaiveTime,
    #[serde(with = "time_of_day")]
    pub close_hour: NaiveTime,
    pub rating: f64,
}

impl Venue {
    #[inline]
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// A single nearby-and-open lookup
///
/// `at` is captured once per request so every shard judges opening hours
/// against the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub at: NaiveTime,
}

impl QueryPoint {
    pub fn new(latitude: f64, longitude: f64, at: NaiveTime) -> Self {
        Self { latitude, longitude, at }
    }

    #[inline]
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Venues matching one query, in no particular order
pub type MatchSet = Vec<Venue>;

/// Serde adapter for `HH:MM:SS` times of day
pub mod time_of_day {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(TIME_OF_DAY_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), TIME_OF_DAY_FORMAT).map_err(serde::de::Error::custom)
    }
}
