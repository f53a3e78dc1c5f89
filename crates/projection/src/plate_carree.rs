//! Plate Carrée (equirectangular) projection.
//!
//! Longitude and latitude map linearly onto x and y. Projected units are
//! degrees, so one degree of longitude and one degree of latitude have the
//! same length on the map, which gives the "equal aspect" framing the maps
//! are drawn with.

use crate::Projection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    /// Longitude (degrees) placed at x = 0
    pub central_longitude: f64,
}

impl PlateCarree {
    pub fn new(central_longitude: f64) -> Self {
        Self { central_longitude }
    }
}

impl Default for PlateCarree {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Projection for PlateCarree {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        // Wrap into [-180, 180) relative to the central meridian
        let mut x = lon - self.central_longitude;
        if x >= 180.0 || x < -180.0 {
            x = (x + 180.0).rem_euclid(360.0) - 180.0;
        }
        (x, lat)
    }
}
