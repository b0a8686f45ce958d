//! Dated prayer results and current/next tagging.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Weekday};
use miqat_types::{GeoCoordinate, MiqatError, TimeName, TimeTable, TimeValue};
use serde::Serialize;

use crate::format::{TimeFormatter, split_day};
use crate::request::TimesRequest;

/// Display name used for Dhuhr on Fridays.
pub const JUMUAH: &str = "Jumuah";

/// One computed time, anchored to a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerResult {
    /// Display name; `"Jumuah"` for a Friday Dhuhr.
    pub name: String,
    pub kind: TimeName,
    /// Fractional hour as computed, relative to the requested day.
    pub time: TimeValue,
    /// Absolute time, or `None` when the time does not exist that day.
    pub date: Option<DateTime<FixedOffset>>,
    pub request_date: DateTime<FixedOffset>,
    pub coordinates: GeoCoordinate,
    pub utc_offset: f64,
    pub abbreviation: Option<&'static str>,
    pub formatted_time: String,
    pub is_fard: bool,
    pub is_current: bool,
    pub is_next: bool,
}

impl PrayerResult {
    fn new(
        kind: TimeName,
        time: TimeValue,
        anchor: NaiveDate,
        request_date: DateTime<FixedOffset>,
        coordinates: GeoCoordinate,
        utc_offset: f64,
        formatter: &TimeFormatter,
    ) -> Result<Self, MiqatError> {
        let date = match time {
            TimeValue::Hours(hours) => Some(anchor_time(anchor, hours, request_date.offset())?),
            TimeValue::Invalid => None,
        };

        Ok(Self {
            name: kind.name().to_string(),
            kind,
            time,
            date,
            request_date,
            coordinates,
            utc_offset,
            abbreviation: kind.abbreviation(),
            formatted_time: formatter.format(time),
            is_fard: kind.is_fard(),
            is_current: false,
            is_next: false,
        })
    }

    /// True for Dhuhr falling on a Friday.
    pub fn is_jumuah(&self) -> bool {
        self.kind == TimeName::Dhuhr && self.date.is_some_and(|d| d.weekday() == Weekday::Fri)
    }

    fn shift_days(&mut self, days: i64) {
        if let Some(date) = self.date {
            self.date = Some(date + Duration::days(days));
        }
    }
}

/// Results for one calendar day of a range query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerResultSeries {
    /// Local midnight of the day.
    pub date: DateTime<FixedOffset>,
    pub times: Vec<PrayerResult>,
}

/// `hours` after midnight of `anchor`, rounded to the minute.
fn anchor_time(
    anchor: NaiveDate,
    hours: f64,
    offset: &FixedOffset,
) -> Result<DateTime<FixedOffset>, MiqatError> {
    let (days, minute_of_day) = split_day(hours);
    let date = anchor
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| MiqatError::date_out_of_range(anchor))?;
    let naive = date
        .and_hms_opt((minute_of_day / 60) as u32, (minute_of_day % 60) as u32, 0)
        .ok_or_else(|| MiqatError::date_out_of_range(date))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| MiqatError::date_out_of_range(date))
}

/// Dates every time against `anchor` and sorts by computed hour.
fn materialize(
    times: &TimeTable<TimeValue>,
    anchor: NaiveDate,
    request: &TimesRequest,
    reference: DateTime<FixedOffset>,
    utc_offset: f64,
    formatter: &TimeFormatter,
) -> Result<Vec<PrayerResult>, MiqatError> {
    let mut results = times
        .iter()
        .map(|(kind, time)| {
            let coordinates = request.coordinates;
            PrayerResult::new(kind, *time, anchor, reference, coordinates, utc_offset, formatter)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // invalid times sort last
    results.sort_by(|a, b| {
        let a = a.time.hours().unwrap_or(f64::INFINITY);
        let b = b.time.hours().unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    Ok(results)
}

/// Names Friday Dhuhr and drops the times the request does not want.
fn finish(results: &mut Vec<PrayerResult>, request: &TimesRequest) {
    for result in results.iter_mut() {
        if result.is_jumuah() {
            result.name = JUMUAH.to_string();
        }
    }

    results.retain(|r| {
        if request.only_essentials {
            r.kind.is_essential()
        } else {
            r.kind != TimeName::Sunset
        }
    });
}

/// Materializes, sorts, tags and filters one day of computed times.
pub(crate) fn build_results(
    times: &TimeTable<TimeValue>,
    request: &TimesRequest,
    reference: DateTime<FixedOffset>,
    utc_offset: f64,
    formatter: &TimeFormatter,
) -> Result<Vec<PrayerResult>, MiqatError> {
    let mut results =
        materialize(times, reference.date_naive(), request, reference, utc_offset, formatter)?;
    assign_status(&mut results, reference);
    finish(&mut results, request);
    Ok(results)
}

/// One calendar day of a range, every time dated against `day`.
///
/// No current/next tagging happens here, so nothing is moved across days.
pub(crate) fn build_day(
    times: &TimeTable<TimeValue>,
    day: NaiveDate,
    request: &TimesRequest,
    reference: DateTime<FixedOffset>,
    utc_offset: f64,
    formatter: &TimeFormatter,
) -> Result<Vec<PrayerResult>, MiqatError> {
    let mut results = materialize(times, day, request, reference, utc_offset, formatter)?;
    finish(&mut results, request);
    Ok(results)
}

/// Tags current and next, then moves results into the cycle around `reference`.
pub(crate) fn assign_status(results: &mut [PrayerResult], reference: DateTime<FixedOffset>) {
    let next = results
        .iter()
        .find(|r| r.kind.is_essential() && r.date.is_some_and(|d| d > reference))
        .map(|r| r.kind);

    let (current, next) = match next {
        Some(next) => (next.previous_prayer(), next),
        None => (TimeName::Isha, TimeName::Fajr),
    };

    for result in results.iter_mut() {
        result.is_current = result.kind == current;
        result.is_next = result.kind == next;

        let Some(date) = result.date else { continue };
        if date < reference {
            if !result.is_current {
                result.shift_days(1);
            }
        } else if result.is_current && result.kind == TimeName::Isha {
            // still inside yesterday's Isha
            result.shift_days(-1);
        }
    }
}
