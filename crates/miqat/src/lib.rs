//! # Miqat
//!
//! Islamic prayer times for any coordinate and date, following the
//! conventions of the major calculation authorities.
//!
//! This crate is a facade that re-exports functionality from the `miqat` ecosystem.
//!
//! ## Modules
//!
//! - `types`: Core types (TimeName, GeoCoordinate, PrayerMethod, etc.)
//! - `astronomy`: Solar position and sun-angle solving
//! - `network`: Remote time zone lookup (optional, `async` feature)
//!
//! ## Usage
//!
//! ```rust
//! use miqat::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let pt = PrayTimes::with_method(CalculationMethod::ISNA);
//! let request = TimesRequest::new(
//!     GeoCoordinate::new(43.7, -79.4).unwrap(),
//!     Utc.with_ymd_and_hms(2016, 3, 16, 22, 0, 0).unwrap(),
//! )
//! .utc_offset(-5.0)
//! .format(TimeFormat::H24);
//!
//! let times = pt.get_times(&request).unwrap();
//! let fajr = times.iter().find(|t| t.kind == TimeName::Fajr).unwrap();
//! assert_eq!(fajr.formatted_time, "05:08");
//! ```

pub use miqat_core::*;
