// Timestamp Domain Type
//
// UTC, microsecond precision, one fixed textual layout. Stored and compared
// as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// strftime layout for the canonical text form
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Placeholder emitted by outer joins when the child row is absent
pub const EPOCH_SENTINEL: &str = "1970-01-01T00:00:00.000000Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datetime(DateTime<Utc>);

impl Datetime {
    /// Truncates to microseconds so that values survive a text round trip
    pub fn from_utc(value: DateTime<Utc>) -> Self {
        Self(value.trunc_subsecs(6))
    }

    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::default())
    }

    /// Parse the canonical text form (any RFC 3339 offset is normalised to UTC)
    pub fn parse(text: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self::from_utc(dt.with_timezone(&Utc)))
            .map_err(|e| StoreError::storage(format!("invalid timestamp {text:?}"), e))
    }

    pub fn to_db_string(&self) -> String {
        self.0.format(DATETIME_FORMAT).to_string()
    }

    /// The smallest representable instant after this one
    pub fn next_tick(&self) -> Self {
        Self(self.0 + Duration::microseconds(1))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Datetime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_utc(value)
    }
}

impl std::fmt::Display for Datetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_db_string())
    }
}

impl Serialize for Datetime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_db_string())
    }
}

impl<'de> Deserialize<'de> for Datetime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Datetime::parse(&text).map_err(serde::de::Error::custom)
    }
}
