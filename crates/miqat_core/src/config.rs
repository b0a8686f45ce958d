//! Calculator configuration and baseline tables.

use miqat_types::{
    AdjustmentMethod, AdjustmentParam, ElevationMethod, MiqatError, PrayerMethod, TimeName,
    TimeTable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::methods::CalculationMethod;

/// Display format for clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `"05:08"`
    #[serde(rename = "24h")]
    H24,
    /// `"5:08 am"`
    #[default]
    #[serde(rename = "12h")]
    H12,
    /// `"5:08"`
    #[serde(rename = "12hNS")]
    H12NoSuffix,
    /// Raw fractional hour, `"5.137501923491515"`
    #[serde(rename = "Float")]
    Float,
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeFormat::H24 => "24h",
            TimeFormat::H12 => "12h",
            TimeFormat::H12NoSuffix => "12hNS",
            TimeFormat::Float => "Float",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeFormat {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TimeFormat::H24),
            "12h" => Ok(TimeFormat::H12),
            "12hNS" => Ok(TimeFormat::H12NoSuffix),
            "Float" => Ok(TimeFormat::Float),
            other => Err(MiqatError::invalid_config(format!("Unknown time format: {}", other))),
        }
    }
}

/// Baseline tables every calculator starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Backfilled into every method that leaves these times unset.
    pub params: Vec<AdjustmentParam>,
    /// Settings in effect before a method is applied.
    pub settings: Vec<AdjustmentParam>,
    /// Initial hour guesses fed to the solver.
    pub times: TimeTable<f64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            params: vec![
                AdjustmentParam::minute(TimeName::Maghrib, 0.0),
                AdjustmentParam::method(TimeName::Midnight, AdjustmentMethod::Standard),
            ],
            settings: vec![
                AdjustmentParam::minute(TimeName::Imsak, 10.0),
                AdjustmentParam::minute(TimeName::Dhuhr, 0.0),
                AdjustmentParam::method(TimeName::Asr, AdjustmentMethod::Standard),
            ],
            times: TimeTable::from_fn(|name| match name {
                TimeName::Imsak | TimeName::Fajr => 5.0,
                TimeName::Sunrise => 6.0,
                TimeName::Dhuhr => 12.0,
                TimeName::Asr => 13.0,
                TimeName::Sunset | TimeName::Maghrib | TimeName::Isha => 18.0,
                TimeName::Midnight => 0.0,
            }),
        }
    }
}

/// Calculator configuration.
///
/// Deserializes from partial documents; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry key of the calculation method, e.g. `"ISNA"`.
    pub method: String,
    /// Used instead of `method` when set.
    pub custom_method: Option<PrayerMethod>,
    /// Replaces every `Method` setting (Asr factor, Midnight rule).
    pub juristic: Option<AdjustmentMethod>,
    pub elevation: ElevationMethod,
    pub time_format: TimeFormat,
    /// am/pm labels for the 12 hour format.
    pub time_suffixes: [String; 2],
    /// Rendered in place of times that do not exist.
    pub invalid_time: String,
    /// Added to an explicit UTC offset when daylight saving is flagged.
    pub dst_offset_secs: i32,
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: CalculationMethod::default().key().to_string(),
            custom_method: None,
            juristic: None,
            elevation: ElevationMethod::default(),
            time_format: TimeFormat::default(),
            time_suffixes: ["am".to_string(), "pm".to_string()],
            invalid_time: "-----".to_string(),
            dst_offset_secs: 3600,
            defaults: Defaults::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn custom_method(mut self, method: PrayerMethod) -> Self {
        self.custom_method = Some(method);
        self
    }

    pub fn juristic(mut self, juristic: AdjustmentMethod) -> Self {
        self.juristic = Some(juristic);
        self
    }

    pub fn elevation(mut self, elevation: ElevationMethod) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn time_suffixes(mut self, am: impl Into<String>, pm: impl Into<String>) -> Self {
        self.time_suffixes = [am.into(), pm.into()];
        self
    }

    pub fn invalid_time(mut self, sentinel: impl Into<String>) -> Self {
        self.invalid_time = sentinel.into();
        self
    }

    pub fn dst_offset_secs(mut self, secs: i32) -> Self {
        self.dst_offset_secs = secs;
        self
    }

    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }
}
