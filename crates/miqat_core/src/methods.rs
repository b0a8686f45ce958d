//! Built-in calculation method registry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use miqat_types::{AdjustmentMethod, AdjustmentParam, MiqatError, PrayerMethod, TimeName};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Well-known calculation conventions.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum CalculationMethod {
    #[default]
    MWL,
    ISNA,
    Egypt,
    Makkah,
    Karachi,
    Tehran,
    Jafari,
    UOIF,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 8] = [
        CalculationMethod::MWL,
        CalculationMethod::ISNA,
        CalculationMethod::Egypt,
        CalculationMethod::Makkah,
        CalculationMethod::Karachi,
        CalculationMethod::Tehran,
        CalculationMethod::Jafari,
        CalculationMethod::UOIF,
    ];

    /// Registry key, e.g. `"ISNA"`.
    pub fn key(&self) -> &'static str {
        match self {
            CalculationMethod::MWL => "MWL",
            CalculationMethod::ISNA => "ISNA",
            CalculationMethod::Egypt => "Egypt",
            CalculationMethod::Makkah => "Makkah",
            CalculationMethod::Karachi => "Karachi",
            CalculationMethod::Tehran => "Tehran",
            CalculationMethod::Jafari => "Jafari",
            CalculationMethod::UOIF => "UOIF",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalculationMethod::MWL => "Muslim World League",
            CalculationMethod::ISNA => "Islamic Society of North America (ISNA)",
            CalculationMethod::Egypt => "Egyptian General Authority of Survey",
            CalculationMethod::Makkah => "Umm Al-Qura University, Makkah",
            CalculationMethod::Karachi => "University of Islamic Sciences, Karachi",
            CalculationMethod::Tehran => "Institute of Geophysics, University of Tehran",
            CalculationMethod::Jafari => "Shia Ithna-Ashari, Leva Institute, Qum",
            CalculationMethod::UOIF => "Union des Organisations Islamiques de France",
        }
    }

    /// Parameters defined by the method itself, before defaults are backfilled.
    pub fn params(&self) -> SmallVec<[AdjustmentParam; 4]> {
        use AdjustmentParam as P;
        use TimeName::*;

        match self {
            CalculationMethod::MWL => smallvec![P::degree(Fajr, 18.0), P::degree(Isha, 17.0)],
            CalculationMethod::ISNA => smallvec![P::degree(Fajr, 15.0), P::degree(Isha, 15.0)],
            CalculationMethod::Egypt => smallvec![P::degree(Fajr, 19.5), P::degree(Isha, 17.5)],
            // Isha is a fixed interval after Maghrib
            CalculationMethod::Makkah => smallvec![P::degree(Fajr, 18.5), P::minute(Isha, 90.0)],
            CalculationMethod::Karachi => smallvec![P::degree(Fajr, 18.0), P::degree(Isha, 18.0)],
            CalculationMethod::Tehran => smallvec![
                P::degree(Fajr, 17.7),
                P::degree(Isha, 14.0),
                P::degree(Maghrib, 4.5),
                P::method(Midnight, AdjustmentMethod::Jafari),
            ],
            CalculationMethod::Jafari => smallvec![
                P::degree(Fajr, 16.0),
                P::degree(Isha, 14.0),
                P::degree(Maghrib, 4.0),
                P::method(Midnight, AdjustmentMethod::Jafari),
            ],
            CalculationMethod::UOIF => smallvec![P::degree(Fajr, 12.0), P::degree(Isha, 12.0)],
        }
    }

    /// Full method with `defaults` backfilled for unset times.
    pub fn prayer_method(&self, defaults: &[AdjustmentParam]) -> PrayerMethod {
        PrayerMethod::new(self.description(), self.params()).with_defaults(defaults)
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CalculationMethod {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MiqatError::invalid_config(format!("Unknown calculation method: {}", s)))
    }
}

/// Every built-in method, keyed and backfilled with `defaults`.
pub fn registry(defaults: &[AdjustmentParam]) -> BTreeMap<CalculationMethod, PrayerMethod> {
    CalculationMethod::ALL
        .into_iter()
        .map(|m| (m, m.prayer_method(defaults)))
        .collect()
}
