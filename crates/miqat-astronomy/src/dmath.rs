//! Degree-based trigonometry and range reduction.

use std::f64::consts::PI;

/// Degrees to radians.
pub fn dtr(d: f64) -> f64 {
    (d * PI) / 180.0
}

/// Radians to degrees.
pub fn rtd(r: f64) -> f64 {
    (r * 180.0) / PI
}

pub fn sin(d: f64) -> f64 {
    dtr(d).sin()
}

pub fn cos(d: f64) -> f64 {
    dtr(d).cos()
}

pub fn tan(d: f64) -> f64 {
    dtr(d).tan()
}

pub fn arcsin(x: f64) -> f64 {
    rtd(x.asin())
}

/// NaN when `x` is outside [-1, 1].
pub fn arccos(x: f64) -> f64 {
    rtd(x.acos())
}

pub fn arctan(x: f64) -> f64 {
    rtd(x.atan())
}

pub fn arccot(x: f64) -> f64 {
    rtd((1.0 / x).atan())
}

pub fn arctan2(y: f64, x: f64) -> f64 {
    rtd(y.atan2(x))
}

/// Reduces `a` into `[0, b)`.
pub fn fix(a: f64, b: f64) -> f64 {
    let a = a - b * (a / b).floor();
    if a < 0.0 { a + b } else { a }
}

pub fn fix_angle(a: f64) -> f64 {
    fix(a, 360.0)
}

pub fn fix_hour(a: f64) -> f64 {
    fix(a, 24.0)
}

/// Hours from `time1` forward to `time2`, wrapping at midnight.
pub fn time_diff(time1: f64, time2: f64) -> f64 {
    fix_hour(time2 - time1)
}
