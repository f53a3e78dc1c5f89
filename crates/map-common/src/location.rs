//! Locations and routes plotted on a map.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Point shifted by `dlon` / `dlat` degrees.
    pub fn offset(&self, dlon: f64, dlat: f64) -> Self {
        Self::new(self.lon + dlon, self.lat + dlat)
    }
}

/// Role of a location in the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Production,
    Distribution,
    Market,
    Port,
    CityCenter,
}

/// Marker glyph drawn for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
}

/// Visual style of a scatter marker.
///
/// `size` follows matplotlib's scatter convention: the marker *area* in
/// points squared, so the marker spans `sqrt(size)` points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Color,
    pub shape: MarkerShape,
    pub size: f32,
    pub edge_color: Color,
    /// Edge width in points
    pub edge_width: f32,
    pub alpha: f32,
}

impl MarkerStyle {
    pub fn new(color: Color, shape: MarkerShape, size: f32) -> Self {
        Self {
            color,
            shape,
            size,
            edge_color: Color::BLACK,
            edge_width: 1.5,
            alpha: 0.7,
        }
    }

    pub fn edge_width(mut self, width: f32) -> Self {
        self.edge_width = width;
        self
    }

    /// Side length (diameter for circles) in points.
    pub fn extent_pt(&self) -> f32 {
        self.size.max(0.0).sqrt()
    }
}

/// Where the name of a location is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LabelPlacement {
    /// Boxed text anchored bottom-left at the point shifted by degrees.
    Text { dlon: f64, dlat: f64 },
    /// Boxed text shifted by points, joined to the point with a curved arrow.
    Annotation { dx_pt: f32, dy_pt: f32 },
}

/// A named location on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub point: GeoPoint,
    pub category: Category,
    pub marker: MarkerStyle,
    pub label: LabelPlacement,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        point: GeoPoint,
        category: Category,
        marker: MarkerStyle,
        label: LabelPlacement,
    ) -> Self {
        Self {
            name: name.into(),
            point,
            category,
            marker,
            label,
        }
    }
}

/// A logistics connection between two locations, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub from: String,
    pub to: String,
}

impl Route {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_extent() {
        let style = MarkerStyle::new(Color::RED, MarkerShape::Circle, 400.0);
        assert_eq!(style.extent_pt(), 20.0);
        assert_eq!(style.edge_width, 1.5);
        assert_eq!(style.edge_width(2.0).edge_width, 2.0);
    }

    #[test]
    fn test_geo_point_offset() {
        let p = GeoPoint::new(9.9937, 53.5511).offset(0.2, 0.1);
        assert!((p.lon - 10.1937).abs() < 1e-9);
        assert!((p.lat - 53.6511).abs() < 1e-9);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::CityCenter).unwrap();
        assert_eq!(json, "\"city_center\"");
    }
}
