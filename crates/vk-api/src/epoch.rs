//! Unix-seconds timestamp codec
//!
//! VK reports times (e.g. `last_seen.time`) as a bare JSON integer of
//! seconds since 1970-01-01T00:00:00Z. `EpochTime` decodes that form only:
//! floats and quoted strings are rejected rather than coerced. Sub-second
//! precision is always zero.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EpochTime(i64);

impl EpochTime {
    /// Timestamp for `secs` seconds after the epoch (negative is before).
    pub fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    pub fn unix(&self) -> i64 {
        self.0
    }

    /// Calendar time in UTC, `None` when the seconds fall outside the
    /// range `chrono` can represent.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl From<DateTime<Utc>> for EpochTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp())
    }
}

impl fmt::Display for EpochTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unix())
    }
}

impl FromStr for EpochTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse()
            .map(Self)
            .map_err(|e| Error::Format(format!("{s:?} is not a base-10 integer: {e}")))
    }
}

impl Serialize for EpochTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.unix())
    }
}

impl<'de> Deserialize<'de> for EpochTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_i64(EpochVisitor)
    }
}

struct EpochVisitor;

impl Visitor<'_> for EpochVisitor {
    type Value = EpochTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer count of seconds since the Unix epoch")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<EpochTime, E> {
        Ok(EpochTime(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<EpochTime, E> {
        let secs = i64::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))?;
        Ok(EpochTime(secs))
    }
}
