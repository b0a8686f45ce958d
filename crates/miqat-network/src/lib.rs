//! Network module for remote data fetching.
//!
//! Provides the coordinate-to-UTC-offset lookup used when a caller asks for
//! prayer times at a location whose time zone it does not know.

pub mod timezone;

pub use timezone::{parse_response, GoogleTimeZone, GOOGLE_TIMEZONE_URL};
