//! Gregorian calendar to Julian day conversion.

use chrono::{Datelike, NaiveDate};

/// Julian day at 00:00 of `date` (Meeus, Astronomical Algorithms).
pub fn julian_day(date: NaiveDate) -> f64 {
    let mut year = date.year();
    let mut month = date.month() as i32;
    let day = date.day() as f64;

    if month <= 2 {
        year -= 1;
        month += 12;
    }

    let a = (year as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year + 4716) as f64).floor() + (30.6001 * (month + 1) as f64).floor() + day + b
        - 1524.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_j2000_epoch() {
        // J2000.0 is noon of the first day
        assert_eq!(julian_day(date(2000, 1, 1)), 2451544.5);
        assert_eq!(julian_day(date(2000, 1, 1)) + 0.5, 2451545.0);
    }

    #[test]
    fn test_reference_values() {
        // Meeus, chapter 7
        assert_eq!(julian_day(date(1957, 10, 4)), 2436115.5);
        assert_eq!(julian_day(date(1987, 1, 27)), 2446822.5);
        assert_eq!(julian_day(date(1999, 12, 31)), 2451543.5);
        assert_eq!(julian_day(date(2024, 3, 1)), 2460370.5);
    }

    #[test]
    fn test_consecutive_days() {
        let mut d = date(1999, 12, 25);
        for _ in 0..800 {
            let next = d.succ_opt().unwrap();
            assert_eq!(julian_day(next) - julian_day(d), 1.0);
            d = next;
        }
    }
}
