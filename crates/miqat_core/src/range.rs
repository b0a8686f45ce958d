//! Multi-day queries.
//!
//! Days run from the local date before the start instant to the local date of
//! the end instant, inclusive. The extra leading day supplies the Isha and
//! Midnight that spill past local midnight into the window. Every time stays
//! on the day it was computed for; results are then trimmed to the open
//! window `(start, end)`. Range results carry no current/next flags.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use miqat_types::{MiqatError, TimeZoneResolver};

use crate::calculator::PrayTimes;
use crate::format::TimeFormatter;
use crate::request::{TimesRequest, fixed_offset};
use crate::result::{PrayerResult, PrayerResultSeries, build_day};

/// Calendar days covered by `[start, end]` in the zone of `offset`, plus the
/// day before.
fn local_days(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: &FixedOffset,
) -> Result<Vec<NaiveDate>, MiqatError> {
    let first = start.with_timezone(offset).date_naive();
    let last = end.with_timezone(offset).date_naive();
    let before = first.pred_opt().ok_or_else(|| MiqatError::date_out_of_range(first))?;
    Ok(before.iter_days().take_while(|d| *d <= last).collect())
}

fn local_instant(
    day: NaiveDate,
    time: NaiveTime,
    offset: &FixedOffset,
) -> Result<DateTime<FixedOffset>, MiqatError> {
    offset
        .from_local_datetime(&day.and_time(time))
        .single()
        .ok_or_else(|| MiqatError::date_out_of_range(day))
}

fn within(result: &PrayerResult, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    result
        .date
        .is_some_and(|d| d.with_timezone(&Utc) > start && d.with_timezone(&Utc) < end)
}

/// Request at noon of `day`, used to look up that day's offset.
fn noon_request(
    request: &TimesRequest,
    day: NaiveDate,
    first: &FixedOffset,
) -> Result<TimesRequest, MiqatError> {
    let noon = local_instant(day, NaiveTime::MIN, first)? + Duration::hours(12);
    Ok(request.at(noon.with_timezone(&Utc)))
}

fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) {
    assert!(start < end, "range start {} must precede end {}", start, end);
}

fn push_day(series: &mut Vec<PrayerResultSeries>, entry: PrayerResultSeries) {
    if !entry.times.is_empty() {
        series.push(entry);
    }
}

impl PrayTimes {
    /// One day of a range with the offset already known.
    fn range_day(
        &self,
        request: &TimesRequest,
        day: NaiveDate,
        utc_offset: f64,
        end: DateTime<Utc>,
    ) -> Result<PrayerResultSeries, MiqatError> {
        let offset = fixed_offset(utc_offset)?;
        let midnight = local_instant(day, NaiveTime::MIN, &offset)?;

        let computed = self.compute_times(&request.coordinates, day, utc_offset);
        let formatter = TimeFormatter::from_config(self.config(), request.format);
        let reference = request.date.with_timezone(&offset);

        let mut times = build_day(&computed, day, request, reference, utc_offset, &formatter)?;
        times.retain(|r| within(r, request.date, end));
        times.sort_by_key(|r| r.date);

        Ok(PrayerResultSeries { date: midnight, times })
    }

    /// Results for every day between `request.date` and `end`, grouped by the
    /// day they were computed for.
    ///
    /// Days with nothing inside the window are omitted.
    ///
    /// # Panics
    ///
    /// Panics if `request.date` is not before `end`.
    pub fn get_time_series(
        &self,
        request: &TimesRequest,
        end: DateTime<Utc>,
    ) -> Result<Vec<PrayerResultSeries>, MiqatError> {
        check_window(request.date, end);

        let first_hours = self.known_offset(request).ok_or(MiqatError::TimeZoneUnavailable)?;
        let first = fixed_offset(first_hours)?;
        let start_day = request.date.with_timezone(&first).date_naive();

        let mut series = Vec::new();
        for day in local_days(request.date, end, &first)? {
            let hours = if day == start_day {
                first_hours
            } else {
                let noon = noon_request(request, day, &first)?;
                self.known_offset(&noon).ok_or(MiqatError::TimeZoneUnavailable)?
            };
            push_day(&mut series, self.range_day(request, day, hours, end)?);
        }
        Ok(series)
    }

    /// Chronological results strictly between `request.date` and `end`.
    ///
    /// # Panics
    ///
    /// Panics if `request.date` is not before `end`.
    pub fn get_timeline(
        &self,
        request: &TimesRequest,
        end: DateTime<Utc>,
    ) -> Result<Vec<PrayerResult>, MiqatError> {
        let series = self.get_time_series(request, end)?;
        Ok(flatten(series))
    }

    /// Like [`PrayTimes::get_time_series`], resolving each day's offset in turn.
    ///
    /// The resolver is asked once per computed day.
    pub async fn get_time_series_async<R: TimeZoneResolver>(
        &self,
        request: &TimesRequest,
        end: DateTime<Utc>,
        resolver: &R,
    ) -> Result<Vec<PrayerResultSeries>, MiqatError> {
        check_window(request.date, end);

        let first_hours = self.resolve_offset(request, resolver).await?;
        let first = fixed_offset(first_hours)?;
        let start_day = request.date.with_timezone(&first).date_naive();

        let mut series = Vec::new();
        for day in local_days(request.date, end, &first)? {
            let hours = if day == start_day {
                first_hours
            } else {
                let noon = noon_request(request, day, &first)?;
                self.resolve_offset(&noon, resolver).await?
            };
            push_day(&mut series, self.range_day(request, day, hours, end)?);
        }
        Ok(series)
    }

    pub async fn get_timeline_async<R: TimeZoneResolver>(
        &self,
        request: &TimesRequest,
        end: DateTime<Utc>,
        resolver: &R,
    ) -> Result<Vec<PrayerResult>, MiqatError> {
        let series = self.get_time_series_async(request, end, resolver).await?;
        Ok(flatten(series))
    }
}

fn flatten(series: Vec<PrayerResultSeries>) -> Vec<PrayerResult> {
    let mut timeline: Vec<PrayerResult> = series.into_iter().flat_map(|s| s.times).collect();
    timeline.sort_by_key(|r| r.date);
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::CalculationMethod;
    use chrono::Datelike;
    use miqat_types::{FixedZone, GeoCoordinate, TimeName, ZoneOffset};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn toronto(date: &str) -> TimesRequest {
        TimesRequest::new(GeoCoordinate::new_unchecked(43.7, -79.4), at(date)).utc_offset(-4.0)
    }

    #[test]
    fn test_thirty_day_series() {
        let pt = PrayTimes::with_method(CalculationMethod::ISNA);
        let series = pt
            .get_time_series(&toronto("2024-06-01T16:00:00Z"), at("2024-06-30T16:00:00Z"))
            .unwrap();

        assert_eq!(series.len(), 30);
        for day in &series {
            let dates: Vec<_> = day.times.iter().map(|r| r.date.unwrap()).collect();
            assert!(dates.windows(2).all(|w| w[0] <= w[1]), "unsorted day {}", day.date);
            assert!(
                day.times.windows(2).all(|w| w[0].kind < w[1].kind),
                "misordered day {}",
                day.date
            );
        }
        assert_eq!(series[0].date.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(series[29].date.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_timeline_is_trimmed_and_sorted() {
        let pt = PrayTimes::with_method(CalculationMethod::ISNA);
        let start = at("2024-06-01T16:00:00Z");
        let end = at("2024-06-04T16:00:00Z");
        let timeline = pt.get_timeline(&toronto("2024-06-01T16:00:00Z"), end).unwrap();

        assert!(!timeline.is_empty());
        for pair in timeline.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
        for result in &timeline {
            let date = result.date.unwrap().with_timezone(&Utc);
            assert!(date > start && date < end);
        }

        // three full days of Fajr inside the window
        let fajrs = timeline.iter().filter(|r| r.kind == TimeName::Fajr).count();
        assert_eq!(fajrs, 3);
    }

    #[test]
    fn test_window_edges_keep_isha_and_midnight() {
        let pt = PrayTimes::with_method(CalculationMethod::ISNA);
        let start = at("2024-06-01T04:00:00Z");
        let end = at("2024-06-04T03:59:00Z");
        let request = toronto("2024-06-01T04:00:00Z");

        let timeline = pt.get_timeline(&request, end).unwrap();
        let days_of = |kind: TimeName| -> Vec<u32> {
            timeline
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.date.unwrap().day())
                .collect()
        };
        assert_eq!(days_of(TimeName::Isha), [1, 2, 3]);
        // the night of May 31 ends after local midnight on June 1
        assert_eq!(days_of(TimeName::Midnight), [1, 2, 3]);
        assert_eq!(days_of(TimeName::Fajr), [1, 2, 3]);
        assert!(timeline.iter().all(|r| !r.is_current && !r.is_next));

        let series = pt.get_time_series(&request, end).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].date.day(), 31);
        assert_eq!(series[0].times.len(), 1);
        assert_eq!(series[0].times[0].kind, TimeName::Midnight);

        for day in &series[1..] {
            let kinds: Vec<_> = day.times.iter().map(|r| r.kind).collect();
            assert_eq!(
                kinds,
                [
                    TimeName::Imsak,
                    TimeName::Fajr,
                    TimeName::Sunrise,
                    TimeName::Dhuhr,
                    TimeName::Asr,
                    TimeName::Maghrib,
                    TimeName::Isha,
                    TimeName::Midnight,
                ][..kinds.len()]
            );
            let isha = day.times.iter().find(|r| r.kind == TimeName::Isha).unwrap();
            assert_eq!(isha.date.unwrap().date_naive(), day.date.date_naive());
            for result in &day.times {
                let date = result.date.unwrap().with_timezone(&Utc);
                assert!(date > start && date < end);
            }
        }
    }

    #[test]
    #[should_panic(expected = "must precede")]
    fn test_reversed_window_panics() {
        let pt = PrayTimes::default();
        let _ = pt.get_timeline(&toronto("2024-06-05T00:00:00Z"), at("2024-06-01T00:00:00Z"));
    }

    #[test]
    fn test_remote_range_needs_offset() {
        let pt = PrayTimes::default();
        let coords = GeoCoordinate::new_unchecked(43.7, -79.4);
        let request = TimesRequest::new(coords, at("2024-06-01T00:00:00Z")).local_coords(false);
        let result = pt.get_timeline(&request, at("2024-06-03T00:00:00Z"));
        assert!(matches!(result, Err(MiqatError::TimeZoneUnavailable)));
    }

    #[tokio::test]
    async fn test_async_series_matches_sync() {
        let pt = PrayTimes::with_method(CalculationMethod::MWL);
        let start = at("2024-06-01T16:00:00Z");
        let end = at("2024-06-08T16:00:00Z");

        let remote = TimesRequest::new(GeoCoordinate::new_unchecked(43.7, -79.4), start)
            .local_coords(false)
            .dst(true);
        let resolver = FixedZone(ZoneOffset::new(-5.0, 1.0));
        let from_resolver = pt.get_time_series_async(&remote, end, &resolver).await.unwrap();

        let explicit = pt.get_time_series(&toronto("2024-06-01T16:00:00Z"), end).unwrap();
        assert_eq!(from_resolver, explicit);

        let timeline = pt.get_timeline_async(&remote, end, &resolver).await.unwrap();
        assert_eq!(timeline.len(), explicit.iter().map(|s| s.times.len()).sum::<usize>());
    }

    #[tokio::test]
    async fn test_async_series_resolves_each_day_once() {
        struct Counting(AtomicUsize);
        impl TimeZoneResolver for Counting {
            async fn resolve(&self, _: GeoCoordinate, _: i64) -> Result<ZoneOffset, MiqatError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(ZoneOffset::new(-5.0, 1.0))
            }
        }

        let pt = PrayTimes::default();
        let coords = GeoCoordinate::new_unchecked(43.7, -79.4);
        let request = TimesRequest::new(coords, at("2024-06-01T16:00:00Z"))
            .local_coords(false)
            .dst(true);
        let resolver = Counting(AtomicUsize::new(0));
        pt.get_time_series_async(&request, at("2024-06-08T16:00:00Z"), &resolver)
            .await
            .unwrap();

        // May 31 through June 8
        assert_eq!(resolver.0.load(Ordering::SeqCst), 9);
    }
}
