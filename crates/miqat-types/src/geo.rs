use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::MiqatError;

/// Observer position. Elevation is in metres above sea level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub elevation: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate, rejecting out-of-range latitude or longitude.
    pub fn new(lat: f64, lng: f64) -> Result<Self, MiqatError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MiqatError::invalid_config(format!("Latitude {} outside [-90, 90]", lat)));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(MiqatError::invalid_config(format!(
                "Longitude {} outside [-180, 180]",
                lng
            )));
        }
        Ok(Self::new_unchecked(lat, lng))
    }

    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng, elevation: 0.0 }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation.max(0.0);
        self
    }
}

/// UTC offset reported by a time zone resolver, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneOffset {
    /// Standard offset from UTC.
    pub base_hours: f64,
    /// Daylight saving amount in effect at the requested instant.
    pub dst_hours: f64,
}

impl ZoneOffset {
    pub fn new(base_hours: f64, dst_hours: f64) -> Self {
        Self { base_hours, dst_hours }
    }

    /// Effective offset, including daylight saving when `dst` is set.
    pub fn effective(&self, dst: bool) -> f64 {
        if dst { self.base_hours + self.dst_hours } else { self.base_hours }
    }
}

/// Looks up the UTC offset of a coordinate at a Unix timestamp.
pub trait TimeZoneResolver {
    fn resolve(
        &self,
        coordinates: GeoCoordinate,
        timestamp: i64,
    ) -> impl Future<Output = Result<ZoneOffset, MiqatError>> + Send;
}

/// Resolver that always reports the same offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedZone(pub ZoneOffset);

impl TimeZoneResolver for FixedZone {
    async fn resolve(
        &self,
        _coordinates: GeoCoordinate,
        _timestamp: i64,
    ) -> Result<ZoneOffset, MiqatError> {
        Ok(self.0)
    }
}
