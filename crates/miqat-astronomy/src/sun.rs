//! Low-precision solar position.
//!
//! Ref: http://aa.usno.navy.mil/faq/docs/SunApprox.php

use crate::dmath::{arcsin, arctan2, cos, fix_angle, fix_hour, sin};

/// Sun declination (degrees) and equation of time (hours).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub declination: f64,
    /// Mean minus apparent solar time. Only meaningful modulo 24.
    pub equation: f64,
}

pub fn sun_position(jd: f64) -> SunPosition {
    let d = jd - 2451545.0;
    let g = fix_angle(357.529 + 0.98560028 * d);
    let q = fix_angle(280.459 + 0.98564736 * d);
    let l = fix_angle(q + 1.915 * sin(g) + 0.020 * sin(2.0 * g));
    let e = 23.439 - 0.00000036 * d;

    let ra = arctan2(cos(e) * sin(l), cos(l)) / 15.0;
    let equation = q / 15.0 - fix_hour(ra);
    let declination = arcsin(sin(e) * sin(l));

    SunPosition { declination, equation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_position() {
        let pos = sun_position(2451545.0);
        assert!((pos.declination - -23.0335).abs() < 1e-3);
        // about -3.3 minutes
        assert!((pos.equation * 60.0 - -3.303).abs() < 1e-2);
    }

    #[test]
    fn test_solstices() {
        // 2024-06-21 and 2024-12-21
        assert!((sun_position(2460482.5).declination - 23.4357).abs() < 1e-3);
        assert!((sun_position(2460665.5).declination - -23.4351).abs() < 1e-3);
    }

    #[test]
    fn test_equinox_declination_near_zero() {
        // 2024-03-20
        assert!(sun_position(2460389.5).declination.abs() < 0.5);
    }
}
