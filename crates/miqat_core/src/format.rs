//! Rendering fractional hours as clock strings.

use chrono::Timelike;
use miqat_types::TimeValue;

use crate::config::{Config, TimeFormat};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Minutes since the anchor midnight, rounded to the nearest minute.
///
/// Values past 24 or below 0 spill into neighbouring days.
pub(crate) fn clock_minutes(hours: f64) -> i64 {
    ((hours + 0.5 / 60.0) * 60.0).floor() as i64
}

/// Splits `hours` into whole days and the remaining minute of day.
pub(crate) fn split_day(hours: f64) -> (i64, i64) {
    let minutes = clock_minutes(hours);
    (minutes.div_euclid(MINUTES_PER_DAY), minutes.rem_euclid(MINUTES_PER_DAY))
}

/// Fractional hour of a clock time, ignoring seconds.
pub fn time_to_decimal<T: Timelike>(time: &T) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeFormatter {
    pub format: TimeFormat,
    pub suffixes: [String; 2],
    pub invalid: String,
}

impl TimeFormatter {
    pub fn new(format: TimeFormat) -> Self {
        let config = Config::default();
        Self {
            format,
            suffixes: config.time_suffixes,
            invalid: config.invalid_time,
        }
    }

    pub(crate) fn from_config(config: &Config, format: Option<TimeFormat>) -> Self {
        Self {
            format: format.unwrap_or(config.time_format),
            suffixes: config.time_suffixes.clone(),
            invalid: config.invalid_time.clone(),
        }
    }

    pub fn format(&self, time: TimeValue) -> String {
        // exactly zero is treated as unset
        let hours = match time {
            TimeValue::Hours(h) if h != 0.0 => h,
            _ => return self.invalid.clone(),
        };

        let (_, minute_of_day) = split_day(hours);
        let hour = minute_of_day / 60;
        let minute = minute_of_day % 60;

        match self.format {
            TimeFormat::Float => format!("{}", hours),
            TimeFormat::H24 => format!("{:02}:{:02}", hour, minute),
            TimeFormat::H12 | TimeFormat::H12NoSuffix => {
                let twelve = (hour + 11) % 12 + 1;
                let suffix = if hour < 12 { &self.suffixes[0] } else { &self.suffixes[1] };
                if self.format == TimeFormat::H12 && !suffix.is_empty() {
                    format!("{}:{:02} {}", twelve, minute, suffix)
                } else {
                    format!("{}:{:02}", twelve, minute)
                }
            }
        }
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(TimeFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn hours(h: f64) -> TimeValue {
        TimeValue::Hours(h)
    }

    #[test]
    fn test_24h_format() {
        let f = TimeFormatter::new(TimeFormat::H24);
        assert_eq!(f.format(hours(5.137501923491515)), "05:08");
        assert_eq!(f.format(hours(19.74533620928581)), "19:45");
        // 23:59:45 rounds into the next day
        assert_eq!(f.format(hours(23.0 + 59.75 / 60.0)), "00:00");
    }

    #[test]
    fn test_12h_format() {
        let f = TimeFormatter::new(TimeFormat::H12);
        assert_eq!(f.format(hours(5.137501923491515)), "5:08 am");
        assert_eq!(f.format(hours(12.434142372369653)), "12:26 pm");
        assert_eq!(f.format(hours(15.776787282513435)), "3:47 pm");
        // midnight past 24 wraps
        assert_eq!(f.format(hours(24.4404380670565)), "12:26 am");

        let ns = TimeFormatter::new(TimeFormat::H12NoSuffix);
        assert_eq!(ns.format(hours(15.776787282513435)), "3:47");
    }

    #[test]
    fn test_custom_suffixes() {
        let mut f = TimeFormatter::new(TimeFormat::H12);
        f.suffixes = ["AM".into(), "PM".into()];
        assert_eq!(f.format(hours(18.5)), "6:30 PM");
    }

    #[test]
    fn test_float_format() {
        let f = TimeFormatter::new(TimeFormat::Float);
        assert_eq!(f.format(hours(5.137501923491515)), "5.137501923491515");
    }

    #[test]
    fn test_invalid_and_zero() {
        let f = TimeFormatter::new(TimeFormat::H24);
        assert_eq!(f.format(TimeValue::Invalid), "-----");
        assert_eq!(f.format(hours(0.0)), "-----");
    }

    #[test]
    fn test_split_day() {
        assert_eq!(split_day(24.4404380670565), (1, 26));
        assert_eq!(split_day(-0.5), (-1, 1410));
        assert_eq!(split_day(12.0), (0, 720));
    }

    #[test]
    fn test_time_to_decimal() {
        let t = NaiveTime::from_hms_opt(13, 45, 30).unwrap();
        assert_eq!(time_to_decimal(&t), 13.75);
    }
}
