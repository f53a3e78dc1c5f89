//! Common types shared by the map renderer and the generator binaries.

pub mod bbox;
pub mod color;
pub mod error;
pub mod label;
pub mod location;

pub use bbox::BoundingBox;
pub use color::Color;
pub use error::{MapError, MapResult};
pub use label::{Label, Language};
pub use location::{Category, GeoPoint, LabelPlacement, Location, MarkerShape, MarkerStyle, Route};
