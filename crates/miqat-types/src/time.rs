use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::MiqatError;

/// A named time of day, ordered by astronomical occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeName {
    Imsak,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
    Midnight,
}

impl TimeName {
    pub const COUNT: usize = 9;

    pub const ALL: [TimeName; Self::COUNT] = [
        TimeName::Imsak,
        TimeName::Fajr,
        TimeName::Sunrise,
        TimeName::Dhuhr,
        TimeName::Asr,
        TimeName::Sunset,
        TimeName::Maghrib,
        TimeName::Isha,
        TimeName::Midnight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimeName::Imsak => "Imsak",
            TimeName::Fajr => "Fajr",
            TimeName::Sunrise => "Sunrise",
            TimeName::Dhuhr => "Dhuhr",
            TimeName::Asr => "Asr",
            TimeName::Sunset => "Sunset",
            TimeName::Maghrib => "Maghrib",
            TimeName::Isha => "Isha",
            TimeName::Midnight => "Midnight",
        }
    }

    /// Short display code. Only the five prayers and Sunrise have one.
    pub fn abbreviation(&self) -> Option<&'static str> {
        match self {
            TimeName::Fajr => Some("FJR"),
            TimeName::Sunrise => Some("SHK"),
            TimeName::Dhuhr => Some("DHR"),
            TimeName::Asr => Some("ASR"),
            TimeName::Maghrib => Some("MGB"),
            TimeName::Isha => Some("ISH"),
            _ => None,
        }
    }

    /// True for the five obligatory prayers.
    pub fn is_fard(&self) -> bool {
        matches!(
            self,
            TimeName::Fajr | TimeName::Dhuhr | TimeName::Asr | TimeName::Maghrib | TimeName::Isha
        )
    }

    /// Fard prayers plus Sunrise.
    pub fn is_essential(&self) -> bool {
        self.is_fard() || *self == TimeName::Sunrise
    }

    /// The preceding essential time in the daily cycle (Fajr wraps to Isha).
    pub fn previous_prayer(&self) -> TimeName {
        match self {
            TimeName::Fajr => TimeName::Isha,
            TimeName::Sunrise => TimeName::Fajr,
            TimeName::Dhuhr => TimeName::Sunrise,
            TimeName::Asr => TimeName::Dhuhr,
            TimeName::Maghrib => TimeName::Asr,
            TimeName::Isha => TimeName::Maghrib,
            _ => TimeName::Fajr,
        }
    }

    /// The following essential time in the daily cycle (Isha wraps to Fajr).
    pub fn next_prayer(&self) -> TimeName {
        match self {
            TimeName::Fajr => TimeName::Sunrise,
            TimeName::Sunrise => TimeName::Dhuhr,
            TimeName::Dhuhr => TimeName::Asr,
            TimeName::Asr => TimeName::Maghrib,
            TimeName::Maghrib => TimeName::Isha,
            TimeName::Isha => TimeName::Fajr,
            _ => TimeName::Isha,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeName {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeName::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MiqatError::invalid_config(format!("Unknown time name: {}", s)))
    }
}

/// Fixed-size map keyed by [`TimeName`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeTable<T>([T; TimeName::COUNT]);

impl<T> TimeTable<T> {
    pub fn from_fn(mut f: impl FnMut(TimeName) -> T) -> Self {
        Self(std::array::from_fn(|i| f(TimeName::ALL[i])))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimeName, &T)> {
        TimeName::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TimeName, &mut T)> {
        TimeName::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.iter_mut()
    }

    pub fn map<U>(&self, mut f: impl FnMut(TimeName, &T) -> U) -> TimeTable<U> {
        TimeTable::from_fn(|name| f(name, &self[name]))
    }
}

impl<T: Copy> TimeTable<T> {
    pub fn filled(value: T) -> Self {
        Self([value; TimeName::COUNT])
    }
}

impl<T> Index<TimeName> for TimeTable<T> {
    type Output = T;

    fn index(&self, name: TimeName) -> &T {
        &self.0[name.index()]
    }
}

impl<T> IndexMut<TimeName> for TimeTable<T> {
    fn index_mut(&mut self, name: TimeName) -> &mut T {
        &mut self.0[name.index()]
    }
}

/// A fractional hour of day, or a marker that no time exists.
///
/// High latitudes can ask for a sun depression that is never reached, which
/// makes the hour angle undefined. Such times are carried as `Invalid`
/// instead of a floating NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeValue {
    Hours(f64),
    Invalid,
}

impl TimeValue {
    /// Wraps a raw value; NaN and infinities become `Invalid`.
    pub fn from_hours(hours: f64) -> Self {
        if hours.is_finite() {
            TimeValue::Hours(hours)
        } else {
            TimeValue::Invalid
        }
    }

    pub fn hours(&self) -> Option<f64> {
        match self {
            TimeValue::Hours(h) => Some(*h),
            TimeValue::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TimeValue::Hours(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_get_time_name() {
        assert_eq!(TimeName::Fajr.name(), "Fajr");
        let names: HashSet<&str> = TimeName::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), TimeName::COUNT);
        assert!(names.iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn test_parse_round_trip() {
        for t in TimeName::ALL {
            assert_eq!(t.to_string().parse::<TimeName>().unwrap(), t);
        }
        assert!("Tahajjud".parse::<TimeName>().is_err());
    }

    #[test]
    fn test_prayer_cycle() {
        let mut t = TimeName::Fajr;
        for _ in 0..6 {
            assert_eq!(t.next_prayer().previous_prayer(), t);
            t = t.next_prayer();
        }
        assert_eq!(t, TimeName::Fajr);
        assert_eq!(TimeName::Fajr.previous_prayer(), TimeName::Isha);
    }

    #[test]
    fn test_fard_and_abbreviation() {
        let fard: Vec<_> = TimeName::ALL.into_iter().filter(|t| t.is_fard()).collect();
        assert_eq!(fard.len(), 5);
        assert!(TimeName::Sunrise.is_essential());
        assert!(!TimeName::Sunset.is_essential());
        assert_eq!(TimeName::Sunrise.abbreviation(), Some("SHK"));
        assert_eq!(TimeName::Midnight.abbreviation(), None);
    }

    #[test]
    fn test_time_table_indexing() {
        let mut table = TimeTable::filled(0.0);
        table[TimeName::Asr] += 1.5;
        assert_eq!(table[TimeName::Asr], 1.5);
        assert_eq!(table.iter().filter(|(_, v)| **v != 0.0).count(), 1);

        let doubled = table.map(|_, v| v * 2.0);
        assert_eq!(doubled[TimeName::Asr], 3.0);
    }

    #[test]
    fn test_time_value_from_nan() {
        assert_eq!(TimeValue::from_hours(f64::NAN), TimeValue::Invalid);
        assert_eq!(TimeValue::from_hours(5.5).hours(), Some(5.5));
    }
}
