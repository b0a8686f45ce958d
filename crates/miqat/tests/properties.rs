use chrono::{NaiveDate, TimeZone, Utc};
use miqat::prelude::*;
use proptest::prelude::*;

fn day(days: i64) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    base.checked_add_signed(chrono::Duration::days(days)).unwrap()
}

proptest! {
    /// Invariant: at mid latitudes the daily sequence is strictly ordered.
    #[test]
    fn daily_order_mid_latitudes(
        lat in -45.0f64..45.0,
        lng in -180.0f64..180.0,
        days in 0i64..36500,
    ) {
        let pt = PrayTimes::default();
        let coords = GeoCoordinate::new(lat, lng).unwrap();
        let tz = (lng / 15.0).round();
        let t = pt.compute_times(&coords, day(days), tz);

        let hours = |name: TimeName| t[name].hours().unwrap();
        prop_assert!(hours(TimeName::Imsak) < hours(TimeName::Fajr));
        prop_assert!(hours(TimeName::Fajr) < hours(TimeName::Sunrise));
        prop_assert!(hours(TimeName::Sunrise) < hours(TimeName::Dhuhr));
        prop_assert!(hours(TimeName::Dhuhr) < hours(TimeName::Asr));
        prop_assert!(hours(TimeName::Asr) < hours(TimeName::Sunset));
        prop_assert!(hours(TimeName::Sunset) <= hours(TimeName::Maghrib));
        prop_assert!(hours(TimeName::Maghrib) < hours(TimeName::Isha));
    }

    /// Invariant: no latitude, method or elevation makes the calculator panic.
    #[test]
    fn no_panic_anywhere(
        lat in -90.0f64..=90.0,
        lng in -180.0f64..=180.0,
        elevation in 0.0f64..5000.0,
        method in 0usize..8,
        days in 0i64..36500,
    ) {
        let pt = PrayTimes::with_method(CalculationMethod::ALL[method]);
        let coords = GeoCoordinate::new(lat, lng).unwrap().with_elevation(elevation);
        let date = day(days).and_hms_opt(12, 0, 0).unwrap().and_utc();
        let request = TimesRequest::new(coords, date).utc_offset(0.0);

        let results = pt.get_times(&request).unwrap();
        prop_assert_eq!(results.len(), 8);
        prop_assert!(results.iter().all(|r| !r.formatted_time.is_empty()));
    }

    /// Invariant: exactly one current and one next, on either side of the reference.
    #[test]
    fn current_precedes_reference_next_follows(
        lat in -40.0f64..40.0,
        lng in -180.0f64..180.0,
        secs in 946_684_800i64..4_102_444_800,
    ) {
        let pt = PrayTimes::default();
        let coords = GeoCoordinate::new(lat, lng).unwrap();
        let reference = Utc.timestamp_opt(secs, 0).unwrap();
        let request = TimesRequest::new(coords, reference).utc_offset((lng / 15.0).round());

        let results = pt.get_times(&request).unwrap();
        let current: Vec<_> = results.iter().filter(|r| r.is_current).collect();
        let next: Vec<_> = results.iter().filter(|r| r.is_next).collect();
        prop_assert_eq!(current.len(), 1);
        prop_assert_eq!(next.len(), 1);

        prop_assert!(current[0].date.unwrap().to_utc() <= reference);
        prop_assert!(next[0].date.unwrap().to_utc() > reference);
        prop_assert_eq!(current[0].kind.next_prayer(), next[0].kind);
    }
}
