//! Astronomical calculations for miqat.
//!
//! Uses the low-precision solar coordinates from the US Naval Observatory,
//! accurate to about a minute of arc over a few centuries around J2000.

pub mod dmath;
pub mod julian;
pub mod solar;
pub mod sun;

pub use julian::julian_day;
pub use solar::{rise_set_angle, Direction, SolarDay, RISE_SET_ANGLE};
pub use sun::{sun_position, SunPosition};
