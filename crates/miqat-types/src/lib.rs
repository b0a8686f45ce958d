//! Core types shared by the miqat crates.

pub mod error;
pub mod geo;
pub mod params;
pub mod time;

pub use error::MiqatError;
pub use geo::{FixedZone, GeoCoordinate, TimeZoneResolver, ZoneOffset};
pub use params::{
    Adjustment, AdjustmentMethod, AdjustmentParam, AdjustmentType, ElevationMethod, PrayerMethod,
};
pub use time::{TimeName, TimeTable, TimeValue};
