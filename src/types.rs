//! Protocol enumerations and request payloads.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use mozaik_crypto::{AES_128_KEY_LENGTH, KEY_SCHEDULE_LENGTH};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Number of computing parties; every request produces exactly this many shares.
pub const PARTY_COUNT: usize = 3;

/// Timestamp format accepted by the ISO helpers (interpreted as UTC).
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Symmetric scheme the device key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// AES-GCM with a 128-bit key (NIST SP 800-38D).
    AesGcm128,
}

impl Algorithm {
    /// Wire identifier, also written into the request context.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::AesGcm128 => "AES-GCM-128",
        }
    }

    /// Required device key size in bytes.
    pub fn key_length(&self) -> usize {
        match self {
            Algorithm::AesGcm128 => AES_128_KEY_LENGTH,
        }
    }
}

impl FromStr for Algorithm {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AES-GCM-128" => Ok(Algorithm::AesGcm128),
            other => Err(ProtocolError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What gets secret-shared: the raw key or its expanded AES key schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SharingMode {
    /// Share the 16-byte key directly.
    RawKey,
    /// Share the 176-byte AES-128 key schedule.
    #[default]
    KeySchedule,
}

impl SharingMode {
    /// Length of every share produced in this mode.
    pub fn share_length(&self) -> usize {
        match self {
            SharingMode::RawKey => AES_128_KEY_LENGTH,
            SharingMode::KeySchedule => KEY_SCHEDULE_LENGTH,
        }
    }
}

/// State-separation tag: first byte of every request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateTag {
    /// Analysis over an explicit list of data indices.
    PointQuery = 0x00,
    /// Analysis over a streaming time window.
    StreamingRange = 0x01,
}

impl StateTag {
    /// First byte of a request context.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Request-specific part of the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    /// Unix timestamps (seconds) of the records to analyse.
    DataIndices(Vec<u64>),
    /// Start and stop of a streaming window (Unix milliseconds).
    StreamingRange { start: u64, stop: u64 },
}

impl RequestPayload {
    /// Tag that separates this payload kind from the others.
    pub fn state_tag(&self) -> StateTag {
        match self {
            RequestPayload::DataIndices(_) => StateTag::PointQuery,
            RequestPayload::StreamingRange { .. } => StateTag::StreamingRange,
        }
    }

    /// Build a point query from `YYYY-MM-DDTHH:MM:SS` timestamps, second precision.
    pub fn data_indices_from_iso<S: AsRef<str>>(dates: &[S]) -> Result<Self> {
        let indices = dates
            .iter()
            .map(|d| parse_iso(d.as_ref()).and_then(|dt| to_unsigned(dt.and_utc().timestamp())))
            .collect::<Result<Vec<_>>>()?;
        Ok(RequestPayload::DataIndices(indices))
    }

    /// Build a streaming window from `YYYY-MM-DDTHH:MM:SS` bounds, millisecond precision.
    pub fn streaming_range_from_iso(start: &str, stop: &str) -> Result<Self> {
        let start = to_unsigned(parse_iso(start)?.and_utc().timestamp_millis())?;
        let stop = to_unsigned(parse_iso(stop)?.and_utc().timestamp_millis())?;
        if stop < start {
            return Err(ProtocolError::MalformedInput(format!(
                "streaming range ends before it starts ({} < {})",
                stop, start
            )));
        }
        Ok(RequestPayload::StreamingRange { start, stop })
    }
}

fn parse_iso(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, ISO_FORMAT)
        .map_err(|e| ProtocolError::MalformedInput(format!("invalid timestamp {:?}: {}", s, e)))
}

fn to_unsigned(ts: i64) -> Result<u64> {
    u64::try_from(ts)
        .map_err(|_| ProtocolError::MalformedInput(format!("timestamp before 1970: {}", ts)))
}
