//! Prayer time calculator.
//!
//! Times are solved in hours on the Greenwich meridian, shifted to local
//! clock time, then clamped for high latitudes, offset by the minute-based
//! settings and finally tuned.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, trace, warn};
use miqat_astronomy::dmath::time_diff;
use miqat_astronomy::{Direction, SolarDay, rise_set_angle};
use miqat_types::{
    Adjustment, AdjustmentMethod, AdjustmentParam, ElevationMethod, GeoCoordinate, PrayerMethod,
    TimeName, TimeTable, TimeValue,
};

use crate::config::Config;
use crate::methods::{CalculationMethod, registry};

/// Stateful calculator: one method, its settings and per-time tuning.
#[derive(Debug, Clone)]
pub struct PrayTimes {
    config: Config,
    method_key: String,
    method: PrayerMethod,
    juristic: Option<AdjustmentMethod>,
    elevation: ElevationMethod,
    settings: TimeTable<Option<Adjustment>>,
    offsets: TimeTable<f64>,
}

impl Default for PrayTimes {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl PrayTimes {
    pub fn new(config: Config) -> Self {
        let fallback = CalculationMethod::default();
        let mut calculator = Self {
            method_key: fallback.key().to_string(),
            method: fallback.prayer_method(&config.defaults.params),
            juristic: config.juristic,
            elevation: config.elevation,
            settings: TimeTable::filled(None),
            offsets: TimeTable::filled(0.0),
            config,
        };

        match calculator.config.custom_method.clone() {
            Some(custom) => calculator.set_custom_method(custom),
            None => {
                let name = calculator.config.method.clone();
                calculator.set_method(&name);
            }
        }
        calculator
    }

    /// Calculator for a built-in method with default configuration.
    pub fn with_method(method: CalculationMethod) -> Self {
        Self::new(Config::new().method(method.key()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- Configuration ---

    /// Switches to a registry method by key.
    ///
    /// Unknown keys keep the current method (settings are still reset and
    /// re-applied) and return `false`.
    pub fn set_method(&mut self, name: &str) -> bool {
        let known = match name.parse::<CalculationMethod>() {
            Ok(method) => {
                self.method_key = method.key().to_string();
                self.method = method.prayer_method(&self.config.defaults.params);
                true
            }
            Err(_) => {
                warn!("Unknown calculation method '{}', keeping {}", name, self.method_key);
                false
            }
        };
        self.apply_method();
        known
    }

    /// Switches to a user-defined method. Unset times take the defaults.
    pub fn set_custom_method(&mut self, method: PrayerMethod) {
        let method = method.with_defaults(&self.config.defaults.params);
        if let Some(elevation) = method.elevation {
            self.elevation = elevation;
        }
        self.method_key = method.name.clone();
        self.method = method;
        self.apply_method();
    }

    fn apply_method(&mut self) {
        self.settings = TimeTable::filled(None);
        let params = self.config.defaults.settings.clone();
        self.adjust(params);
        let params = self.method.params.clone();
        self.adjust(params);

        if let Some(juristic) = self.juristic {
            for (_, setting) in self.settings.iter_mut() {
                if let Some(Adjustment::Method(m)) = setting {
                    *m = juristic;
                }
            }
        }
        debug!("Applied method {} with juristic {:?}", self.method_key, self.juristic);
    }

    /// Replaces settings for the given times. The last entry for a time wins.
    pub fn adjust(&mut self, params: impl IntoIterator<Item = AdjustmentParam>) {
        for param in params {
            self.settings[param.time] = Some(param.adjustment);
        }
    }

    /// Adds minute offsets to the given times. Repeated calls accumulate.
    pub fn tune(&mut self, offsets: impl IntoIterator<Item = (TimeName, f64)>) {
        for (time, minutes) in offsets {
            self.offsets[time] += minutes;
        }
    }

    pub fn set_elevation_method(&mut self, elevation: ElevationMethod) {
        self.elevation = elevation;
    }

    pub fn elevation_method(&self) -> ElevationMethod {
        self.elevation
    }

    pub fn juristic(&self) -> Option<AdjustmentMethod> {
        self.juristic
    }

    /// Key of the active method, or the custom method's name.
    pub fn get_method(&self) -> &str {
        &self.method_key
    }

    pub fn get_prayer_method(&self) -> &PrayerMethod {
        &self.method
    }

    pub fn get_settings(&self) -> Vec<AdjustmentParam> {
        self.settings
            .iter()
            .filter_map(|(time, setting)| setting.map(|adj| AdjustmentParam::new(time, adj)))
            .collect()
    }

    pub fn get_setting(&self, time: TimeName) -> Option<AdjustmentParam> {
        self.settings[time].map(|adj| AdjustmentParam::new(time, adj))
    }

    /// Numeric payload of a setting; 0 when unset or a `Method`.
    pub fn get_setting_value(&self, time: TimeName) -> f64 {
        self.settings[time].map_or(0.0, |adj| adj.value())
    }

    pub fn get_offsets(&self) -> &TimeTable<f64> {
        &self.offsets
    }

    /// The built-in registry, backfilled with this calculator's defaults.
    pub fn get_defaults(&self) -> BTreeMap<CalculationMethod, PrayerMethod> {
        registry(&self.config.defaults.params)
    }

    // --- Computation ---

    /// Local clock times for `date`, in fractional hours.
    ///
    /// Results may fall outside `[0, 24)`; Midnight usually lands past 24.
    pub fn compute_times(
        &self,
        coords: &GeoCoordinate,
        date: NaiveDate,
        utc_offset: f64,
    ) -> TimeTable<TimeValue> {
        self.compute_raw(coords, date, utc_offset)
            .map(|_, hours| TimeValue::from_hours(*hours))
    }

    pub(crate) fn compute_raw(
        &self,
        coords: &GeoCoordinate,
        date: NaiveDate,
        utc_offset: f64,
    ) -> TimeTable<f64> {
        debug!(
            "Computing times for {} at {},{} (utc offset {})",
            date, coords.lat, coords.lng, utc_offset
        );

        let day = SolarDay::new(date, coords);
        let guesses = self.config.defaults.times.map(|_, hours| hours / 24.0);
        let mut times = self.solve(&day, coords, &guesses);

        self.adjust_times(&mut times, coords, utc_offset);

        let night_end = match self.settings[TimeName::Midnight] {
            Some(Adjustment::Method(AdjustmentMethod::Jafari)) => times[TimeName::Fajr],
            _ => times[TimeName::Sunrise],
        };
        times[TimeName::Midnight] =
            times[TimeName::Sunset] + time_diff(times[TimeName::Sunset], night_end) / 2.0;

        for (time, hours) in times.iter_mut() {
            *hours += self.offsets[time] / 60.0;
        }

        trace!("Computed times: {:?}", times);
        times
    }

    fn solve(
        &self,
        day: &SolarDay,
        coords: &GeoCoordinate,
        guesses: &TimeTable<f64>,
    ) -> TimeTable<f64> {
        let horizon = rise_set_angle(coords.elevation);
        let asr_factor = self.asr_factor();

        TimeTable::from_fn(|time| {
            let t = guesses[time];
            match time {
                TimeName::Imsak | TimeName::Fajr => {
                    day.sun_angle_time(self.get_setting_value(time), t, Direction::BeforeNoon)
                }
                TimeName::Sunrise => day.sun_angle_time(horizon, t, Direction::BeforeNoon),
                TimeName::Dhuhr => day.mid_day(t),
                TimeName::Asr => day.asr_time(asr_factor, t),
                TimeName::Sunset => day.sun_angle_time(horizon, t, Direction::AfterNoon),
                TimeName::Maghrib | TimeName::Isha => {
                    day.sun_angle_time(self.get_setting_value(time), t, Direction::AfterNoon)
                }
                TimeName::Midnight => t * 24.0,
            }
        })
    }

    fn asr_factor(&self) -> f64 {
        match self.settings[TimeName::Asr] {
            Some(Adjustment::Method(method)) => method.asr_factor(),
            Some(other) => other.value(),
            None => AdjustmentMethod::Standard.asr_factor(),
        }
    }

    fn is_minute(&self, time: TimeName) -> bool {
        matches!(self.settings[time], Some(Adjustment::Minute(_)))
    }

    fn adjust_times(&self, times: &mut TimeTable<f64>, coords: &GeoCoordinate, utc_offset: f64) {
        let shift = utc_offset - coords.lng / 15.0;
        for hours in times.values_mut() {
            *hours += shift;
        }

        if self.elevation != ElevationMethod::None {
            self.adjust_high_lats(times);
        }

        if self.is_minute(TimeName::Imsak) {
            times[TimeName::Imsak] =
                times[TimeName::Fajr] - self.get_setting_value(TimeName::Imsak) / 60.0;
        }
        if self.is_minute(TimeName::Maghrib) {
            times[TimeName::Maghrib] =
                times[TimeName::Sunset] + self.get_setting_value(TimeName::Maghrib) / 60.0;
        }
        if self.is_minute(TimeName::Isha) {
            times[TimeName::Isha] =
                times[TimeName::Maghrib] + self.get_setting_value(TimeName::Isha) / 60.0;
        }
        times[TimeName::Dhuhr] += self.get_setting_value(TimeName::Dhuhr) / 60.0;
    }

    /// Bounds the twilight times by a portion of the night.
    fn adjust_high_lats(&self, times: &mut TimeTable<f64>) {
        let sunrise = times[TimeName::Sunrise];
        let sunset = times[TimeName::Sunset];
        let night = time_diff(sunset, sunrise);

        for (time, base, direction) in [
            (TimeName::Imsak, sunrise, Direction::BeforeNoon),
            (TimeName::Fajr, sunrise, Direction::BeforeNoon),
            (TimeName::Isha, sunset, Direction::AfterNoon),
            (TimeName::Maghrib, sunset, Direction::AfterNoon),
        ] {
            let angle = self.get_setting_value(time);
            times[time] = self.adjust_hl_time(times[time], base, angle, night, direction);
        }
    }

    fn adjust_hl_time(
        &self,
        time: f64,
        base: f64,
        angle: f64,
        night: f64,
        direction: Direction,
    ) -> f64 {
        let portion = self.night_portion(angle, night);
        let diff = match direction {
            Direction::BeforeNoon => time_diff(time, base),
            Direction::AfterNoon => time_diff(base, time),
        };

        if time.is_nan() || diff > portion {
            match direction {
                Direction::BeforeNoon => base - portion,
                Direction::AfterNoon => base + portion,
            }
        } else {
            time
        }
    }

    fn night_portion(&self, angle: f64, night: f64) -> f64 {
        let portion = match self.elevation {
            ElevationMethod::AngleBased => angle / 60.0,
            ElevationMethod::OneSeventh => 1.0 / 7.0,
            ElevationMethod::NightMiddle | ElevationMethod::None => 1.0 / 2.0,
        };
        portion * night
    }
}
