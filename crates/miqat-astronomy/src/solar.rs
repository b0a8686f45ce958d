//! Sun-angle time solving for a single day and location.

use chrono::NaiveDate;
use miqat_types::GeoCoordinate;

use crate::dmath::{arccos, arccot, cos, fix_hour, sin, tan};
use crate::julian::julian_day;
use crate::sun::sun_position;

/// Refraction plus solar semi-diameter at sea level, in degrees.
pub const RISE_SET_ANGLE: f64 = 0.833;

/// Which side of solar noon an event falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    BeforeNoon,
    AfterNoon,
}

/// Sun depression for sunrise and sunset seen from `elevation` metres.
pub fn rise_set_angle(elevation: f64) -> f64 {
    RISE_SET_ANGLE + 0.0347 * elevation.max(0.0).sqrt()
}

/// Solver bound to one date and observer.
///
/// Returned times are hours on the Greenwich meridian; callers shift them by
/// `utc_offset - lng / 15` to get clock time. Guesses (`t`) are fractions of
/// a day.
#[derive(Debug, Clone, Copy)]
pub struct SolarDay {
    julian: f64,
    latitude: f64,
}

impl SolarDay {
    pub fn new(date: NaiveDate, coords: &GeoCoordinate) -> Self {
        Self {
            julian: julian_day(date) - coords.lng / (15.0 * 24.0),
            latitude: coords.lat,
        }
    }

    pub fn declination(&self, t: f64) -> f64 {
        sun_position(self.julian + t).declination
    }

    /// Solar noon (Dhuhr).
    pub fn mid_day(&self, t: f64) -> f64 {
        let eqt = sun_position(self.julian + t).equation;
        fix_hour(12.0 - eqt)
    }

    /// Time at which the sun is `angle` degrees below the horizon.
    ///
    /// Returns NaN when the sun never reaches that depression on this day.
    pub fn sun_angle_time(&self, angle: f64, t: f64, direction: Direction) -> f64 {
        let decl = self.declination(t);
        let noon = self.mid_day(t);
        let lat = self.latitude;

        let v = 1.0 / 15.0 * arccos((-sin(angle) - sin(decl) * sin(lat)) / (cos(decl) * cos(lat)));

        match direction {
            Direction::BeforeNoon => noon - v,
            Direction::AfterNoon => noon + v,
        }
    }

    /// Asr for the given shadow factor (1 standard, 2 Hanafi).
    pub fn asr_time(&self, factor: f64, t: f64) -> f64 {
        let decl = self.declination(t);
        let angle = -arccot(factor + tan((self.latitude - decl).abs()));
        self.sun_angle_time(angle, t, Direction::AfterNoon)
    }
}
