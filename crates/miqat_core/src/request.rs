//! Single-day queries: offset resolution and the `get_times` entry points.

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use log::debug;
use miqat_types::{GeoCoordinate, MiqatError, TimeZoneResolver};
use serde::{Deserialize, Serialize};

use crate::calculator::PrayTimes;
use crate::config::TimeFormat;
use crate::format::TimeFormatter;
use crate::result::{PrayerResult, build_results};

/// Parameters of a `get_times` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesRequest {
    pub coordinates: GeoCoordinate,
    /// Reference instant. Its local calendar date selects the day computed.
    pub date: DateTime<Utc>,
    /// Explicit UTC offset in hours.
    pub utc_offset: Option<f64>,
    /// Adds the configured DST amount to an explicit offset, or asks a
    /// resolver for the daylight offset.
    pub dst: bool,
    /// Overrides the configured time format.
    pub format: Option<TimeFormat>,
    /// Coordinates share this machine's time zone.
    pub local_coords: bool,
    /// Keep only the five prayers and Sunrise.
    pub only_essentials: bool,
}

impl TimesRequest {
    pub fn new(coordinates: GeoCoordinate, date: DateTime<Utc>) -> Self {
        Self {
            coordinates,
            date,
            utc_offset: None,
            dst: false,
            format: None,
            local_coords: true,
            only_essentials: false,
        }
    }

    pub fn utc_offset(mut self, hours: f64) -> Self {
        self.utc_offset = Some(hours);
        self
    }

    pub fn dst(mut self, dst: bool) -> Self {
        self.dst = dst;
        self
    }

    pub fn format(mut self, format: TimeFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn local_coords(mut self, local: bool) -> Self {
        self.local_coords = local;
        self
    }

    pub fn only_essentials(mut self, only: bool) -> Self {
        self.only_essentials = only;
        self
    }

    /// Same request at another instant.
    pub fn at(&self, date: DateTime<Utc>) -> Self {
        Self { date, ..self.clone() }
    }
}

/// This machine's UTC offset at `at`, in hours.
pub fn local_offset_hours(at: DateTime<Utc>) -> f64 {
    let offset = Local.offset_from_utc_datetime(&at.naive_utc()).fix();
    offset.local_minus_utc() as f64 / 3600.0
}

/// Converts fractional hours into a chrono offset, rounded to the second.
pub fn fixed_offset(hours: f64) -> Result<FixedOffset, MiqatError> {
    let seconds = (hours * 3600.0).round();
    if !seconds.is_finite() || seconds.abs() >= 86_400.0 {
        return Err(MiqatError::invalid_config(format!("UTC offset {} out of range", hours)));
    }
    FixedOffset::east_opt(seconds as i32)
        .ok_or_else(|| MiqatError::invalid_config(format!("UTC offset {} out of range", hours)))
}

impl PrayTimes {
    /// Offset known without a lookup: explicit, or this machine's.
    pub(crate) fn known_offset(&self, request: &TimesRequest) -> Option<f64> {
        if let Some(hours) = request.utc_offset {
            let dst = if request.dst {
                self.config().dst_offset_secs as f64 / 3600.0
            } else {
                0.0
            };
            Some(hours + dst)
        } else if request.local_coords {
            Some(local_offset_hours(request.date))
        } else {
            None
        }
    }

    pub(crate) async fn resolve_offset<R: TimeZoneResolver>(
        &self,
        request: &TimesRequest,
        resolver: &R,
    ) -> Result<f64, MiqatError> {
        if let Some(hours) = self.known_offset(request) {
            return Ok(hours);
        }
        let zone = resolver
            .resolve(request.coordinates, request.date.timestamp())
            .await?;
        debug!("Resolved offset {:?} for {:?}", zone, request.coordinates);
        Ok(zone.effective(request.dst))
    }

    /// Dated results for the day containing `request.date`.
    ///
    /// Fails with `TimeZoneUnavailable` when the coordinates are not local
    /// and no offset is given; use [`PrayTimes::get_times_async`] with a
    /// resolver for those.
    pub fn get_times(&self, request: &TimesRequest) -> Result<Vec<PrayerResult>, MiqatError> {
        let hours = self.known_offset(request).ok_or(MiqatError::TimeZoneUnavailable)?;
        self.times_with_offset(request, hours)
    }

    /// Like [`PrayTimes::get_times`], looking up the offset when needed.
    pub async fn get_times_async<R: TimeZoneResolver>(
        &self,
        request: &TimesRequest,
        resolver: &R,
    ) -> Result<Vec<PrayerResult>, MiqatError> {
        let hours = self.resolve_offset(request, resolver).await?;
        self.times_with_offset(request, hours)
    }

    pub(crate) fn times_with_offset(
        &self,
        request: &TimesRequest,
        utc_offset: f64,
    ) -> Result<Vec<PrayerResult>, MiqatError> {
        let offset = fixed_offset(utc_offset)?;
        let reference = request.date.with_timezone(&offset);
        let day = reference.date_naive();

        let times = self.compute_times(&request.coordinates, day, utc_offset);
        let formatter = TimeFormatter::from_config(self.config(), request.format);

        build_results(&times, request, reference, utc_offset, &formatter)
    }
}
