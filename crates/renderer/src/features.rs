//! Geographic feature layers (coastlines, borders, land, ocean).
//!
//! Layers are read from GeoJSON files, one file per layer, as exported from
//! Natural Earth. Only line and polygon geometries are used; points and
//! geometry collections are ignored.

use map_common::{BoundingBox, Color, MapError, MapResult};
use projection::{Projection, Viewport};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tiny_skia::{FillRule, Mask, PathBuilder, Transform};

use crate::figure::{solid_paint, stroke, Canvas};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Ocean,
    Land,
    Coastline,
    Borders,
}

impl LayerKind {
    /// All layers in drawing order.
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Ocean,
        LayerKind::Land,
        LayerKind::Coastline,
        LayerKind::Borders,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            LayerKind::Ocean => "ocean.geojson",
            LayerKind::Land => "land.geojson",
            LayerKind::Coastline => "coastline.geojson",
            LayerKind::Borders => "borders.geojson",
        }
    }

    pub fn style(&self) -> LayerStyle {
        match self {
            LayerKind::Ocean => LayerStyle::fill(Color::LIGHT_BLUE.with_alpha(0.3)),
            LayerKind::Land => LayerStyle::fill(Color::LIGHT_GRAY.with_alpha(0.5)),
            LayerKind::Coastline | LayerKind::Borders => LayerStyle::line(Color::BLACK, 0.5),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Ocean => "ocean",
            LayerKind::Land => "land",
            LayerKind::Coastline => "coastline",
            LayerKind::Borders => "borders",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub fill: Option<Color>,
    /// Stroke color and width in points
    pub stroke: Option<(Color, f32)>,
}

impl LayerStyle {
    fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    fn line(color: Color, width_pt: f32) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width_pt)),
        }
    }
}

/// One drawable geometry: a polygon (all rings, holes included) or a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub rings: Vec<Vec<(f64, f64)>>,
    pub closed: bool,
}

impl Shape {
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.rings.iter().flatten().copied())
    }
}

#[derive(Debug, Clone)]
pub struct FeatureLayer {
    pub kind: LayerKind,
    pub shapes: Vec<Shape>,
}

// GeoJSON documents, just deep enough to pull out coordinates

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection { features: Vec<Feature> },
    Feature { geometry: Option<Geometry> },
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

type Position = Vec<f64>;

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

fn ring(positions: Vec<Position>) -> Vec<(f64, f64)> {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2 && p[0].is_finite() && p[1].is_finite())
        .map(|p| (p[0], p[1]))
        .collect()
}

fn shapes_of(geometry: Geometry, out: &mut Vec<Shape>) {
    match geometry {
        Geometry::LineString { coordinates } => out.push(Shape {
            rings: vec![ring(coordinates)],
            closed: false,
        }),
        Geometry::MultiLineString { coordinates } => {
            out.extend(coordinates.into_iter().map(|line| Shape {
                rings: vec![ring(line)],
                closed: false,
            }))
        }
        Geometry::Polygon { coordinates } => out.push(Shape {
            rings: coordinates.into_iter().map(ring).collect(),
            closed: true,
        }),
        Geometry::MultiPolygon { coordinates } => {
            out.extend(coordinates.into_iter().map(|polygon| Shape {
                rings: polygon.into_iter().map(ring).collect(),
                closed: true,
            }))
        }
        Geometry::Unsupported => {}
    }
}

impl FeatureLayer {
    /// Parse a GeoJSON `FeatureCollection` or single `Feature`.
    pub fn from_geojson(kind: LayerKind, json: &str) -> MapResult<Self> {
        let document: Document = serde_json::from_str(json).map_err(|e| MapError::FeatureParse {
            layer: kind.to_string(),
            message: e.to_string(),
        })?;

        let geometries: Vec<Geometry> = match document {
            Document::FeatureCollection { features } => {
                features.into_iter().filter_map(|f| f.geometry).collect()
            }
            Document::Feature { geometry } => geometry.into_iter().collect(),
        };

        let mut shapes = Vec::new();
        for geometry in geometries {
            shapes_of(geometry, &mut shapes);
        }
        shapes.retain(|s| s.rings.iter().any(|r| r.len() >= 2));

        Ok(Self { kind, shapes })
    }

    /// Read `<dir>/<kind file name>`.
    pub fn load(kind: LayerKind, dir: &Path) -> MapResult<Self> {
        let path = dir.join(kind.file_name());
        let json = std::fs::read_to_string(&path)?;
        Self::from_geojson(kind, &json)
    }

    /// Keep only shapes whose bounds touch `extent`.
    pub fn clipped_to(&self, extent: &BoundingBox) -> Vec<&Shape> {
        self.shapes
            .iter()
            .filter(|s| {
                s.bounds().map_or(false, |b| {
                    b.intersects(extent) || extent.contains_point(b.min_x, b.min_y)
                })
            })
            .collect()
    }

    /// Draw the layer's shapes within `mask`.
    pub fn draw<P: Projection>(
        &self,
        canvas: &mut Canvas,
        viewport: &Viewport<P>,
        geo_extent: &BoundingBox,
        mask: &Mask,
    ) -> MapResult<usize> {
        let style = self.kind.style();
        let fill = style.fill.map(solid_paint);
        let outline = style
            .stroke
            .map(|(color, width_pt)| (solid_paint(color), stroke(canvas.pt(width_pt), None)));

        let visible = self.clipped_to(geo_extent);
        let mut pixmap = canvas.pixmap()?;

        for shape in &visible {
            let mut pb = PathBuilder::new();
            for ring in &shape.rings {
                let mut points = ring.iter().map(|&(lon, lat)| viewport.to_pixel(lon, lat));
                let Some((x, y)) = points.next() else { continue };
                pb.move_to(x, y);
                for (x, y) in points {
                    pb.line_to(x, y);
                }
                if shape.closed {
                    pb.close();
                }
            }
            let Some(path) = pb.finish() else { continue };

            if let (Some(paint), true) = (&fill, shape.closed) {
                pixmap.fill_path(
                    &path,
                    paint,
                    FillRule::EvenOdd,
                    Transform::identity(),
                    Some(mask),
                );
            }
            if let Some((paint, line)) = &outline {
                pixmap.stroke_path(&path, paint, line, Transform::identity(), Some(mask));
            }
        }

        Ok(visible.len())
    }
}

/// The feature layers that loaded successfully, in drawing order.
#[derive(Debug, Clone, Default)]
pub struct FeatureLayers {
    layers: Vec<FeatureLayer>,
}

impl FeatureLayers {
    pub fn new(mut layers: Vec<FeatureLayer>) -> Self {
        layers.sort_by_key(|l| LayerKind::ALL.iter().position(|k| *k == l.kind));
        Self { layers }
    }

    /// Load every layer from `dir`, skipping (and logging) the ones that fail.
    pub fn load_dir(dir: &Path) -> Self {
        let mut layers = Vec::new();
        for kind in LayerKind::ALL {
            match FeatureLayer::load(kind, dir) {
                Ok(layer) => {
                    tracing::debug!(
                        layer = %kind,
                        shapes = layer.shapes.len(),
                        "Loaded feature layer"
                    );
                    layers.push(layer);
                }
                Err(e) => {
                    tracing::warn!(
                        layer = %kind,
                        error = %e,
                        "Could not load feature layer, continuing without it"
                    );
                }
            }
        }
        Self::new(layers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureLayer> {
        self.layers.iter()
    }

    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "a"},
                 "geometry": {"type": "LineString", "coordinates": [[5.0, 50.0], [6.0, 51.0, 12.0]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0,0],[1,0],[1,1],[0,0]]],
                    [[[2,2],[3,2],[3,3],[2,2]], [[2.2,2.2],[2.8,2.2],[2.8,2.8],[2.2,2.2]]]
                 ]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }"#;

        let layer = FeatureLayer::from_geojson(LayerKind::Coastline, json).unwrap();
        assert_eq!(layer.shapes.len(), 3);
        assert!(!layer.shapes[0].closed);
        assert_eq!(layer.shapes[0].rings[0], vec![(5.0, 50.0), (6.0, 51.0)]);
        assert_eq!(layer.shapes[2].rings.len(), 2);
    }

    #[test]
    fn test_parse_single_feature() {
        let json = r#"{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}"#;
        let layer = FeatureLayer::from_geojson(LayerKind::Land, json).unwrap();
        assert_eq!(layer.shapes.len(), 1);
        assert!(layer.shapes[0].closed);
    }

    #[test]
    fn test_parse_error_names_layer() {
        let err = FeatureLayer::from_geojson(LayerKind::Borders, "{ not json").unwrap_err();
        assert!(err.to_string().contains("borders"));
    }

    #[test]
    fn test_clipped_to_extent() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[9,53],[10,54]]}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[-100,30],[-99,31]]}}
        ]}"#;
        let layer = FeatureLayer::from_geojson(LayerKind::Coastline, json).unwrap();
        let europe = BoundingBox::new(4.0, 47.0, 17.0, 56.0);
        assert_eq!(layer.clipped_to(&europe).len(), 1);
    }

    #[test]
    fn test_layers_sorted_in_drawing_order() {
        let empty = r#"{"type": "FeatureCollection", "features": []}"#;
        let layers = FeatureLayers::new(vec![
            FeatureLayer::from_geojson(LayerKind::Borders, empty).unwrap(),
            FeatureLayer::from_geojson(LayerKind::Ocean, empty).unwrap(),
        ]);
        assert_eq!(layers.kinds(), vec![LayerKind::Ocean, LayerKind::Borders]);
    }
}
