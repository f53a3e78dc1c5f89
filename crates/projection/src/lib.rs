//! Coordinate transformations from geographic degrees to canvas pixels.
//!
//! Implements the projections the maps need from scratch without external
//! dependencies.

pub mod plate_carree;
pub mod viewport;

pub use plate_carree::PlateCarree;
pub use viewport::{PixelRect, Viewport};

/// A map projection from (lon, lat) in degrees to planar coordinates.
pub trait Projection {
    /// Forward transform: geographic degrees to projected x/y.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64);
}
