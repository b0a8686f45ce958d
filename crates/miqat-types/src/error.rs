use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from miqat operations.
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum MiqatError {
    /// Invalid configuration or input value.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// No UTC offset was given for remote coordinates and no resolver is available.
    #[error("UTC offset unknown for non-local coordinates; supply an offset or a time zone resolver")]
    TimeZoneUnavailable,

    /// The external time zone resolver failed.
    #[error("Time zone lookup failed: {0}")]
    TimeZoneLookup(String),

    /// Calendar arithmetic left the representable range.
    #[error("Date {date} is out of supported range")]
    DateOutOfRange { date: NaiveDate },
}

impl MiqatError {
    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }

    /// Creates a `TimeZoneLookup` error.
    pub fn lookup(reason: impl Into<String>) -> Self {
        Self::TimeZoneLookup(reason.into())
    }

    /// Creates a `DateOutOfRange` error.
    pub fn date_out_of_range(date: NaiveDate) -> Self {
        Self::DateOutOfRange { date }
    }
}
