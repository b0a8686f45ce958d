//! Prayer time calculation engine.
//!
//! Ties the solar solver from `miqat-astronomy` to method settings, result
//! tagging and range queries. Remote time zone lookup lives behind the
//! `async` feature.

pub mod calculator;
pub mod config;
pub mod format;
pub mod methods;
pub mod range;
pub mod request;
pub mod result;

pub use miqat_astronomy as astronomy;
#[cfg(feature = "async")]
pub use miqat_network as network;
pub use miqat_types as types;

pub use calculator::PrayTimes;
pub use config::{Config, Defaults, TimeFormat};
pub use format::{TimeFormatter, time_to_decimal};
pub use methods::{CalculationMethod, registry};
pub use request::{TimesRequest, fixed_offset, local_offset_hours};
pub use result::{JUMUAH, PrayerResult, PrayerResultSeries};

pub use miqat_types::{
    Adjustment, AdjustmentMethod, AdjustmentParam, AdjustmentType, ElevationMethod, FixedZone,
    GeoCoordinate, MiqatError, PrayerMethod, TimeName, TimeTable, TimeValue, TimeZoneResolver,
    ZoneOffset,
};

pub mod prelude {
    pub use crate::types::*;
    pub use crate::{
        CalculationMethod, Config, PrayTimes, PrayerResult, PrayerResultSeries, TimeFormat,
        TimesRequest,
    };
}
