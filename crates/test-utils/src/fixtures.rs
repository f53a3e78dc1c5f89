//! Common test fixtures for map generator tests.
//!
//! Feature layers here are coarse hand-drawn outlines of central Europe:
//! good enough to produce visible pixels, nowhere near survey accuracy.

use serde_json::{json, Value};
use std::io;
use std::path::Path;
use tempfile::TempDir;

/// Extents as (min_lon, min_lat, max_lon, max_lat).
pub mod extent {
    /// Germany and its neighbours
    pub const CENTRAL_EUROPE: (f64, f64, f64, f64) = (4.0, 47.0, 17.0, 56.0);
}

fn feature(geometry: Value) -> Value {
    json!({ "type": "Feature", "properties": {}, "geometry": geometry })
}

fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// North Sea and Baltic as two polygons.
pub fn ocean_geojson() -> Value {
    collection(vec![feature(json!({
        "type": "MultiPolygon",
        "coordinates": [
            [[[3.0, 53.3], [8.9, 53.9], [8.6, 57.0], [3.0, 57.0], [3.0, 53.3]]],
            [[[10.9, 54.0], [14.2, 53.9], [17.5, 54.6], [17.5, 57.0], [12.5, 57.0], [10.9, 54.0]]]
        ]
    }))])
}

/// Mainland with an inland lake as a hole.
pub fn land_geojson() -> Value {
    collection(vec![feature(json!({
        "type": "Polygon",
        "coordinates": [
            [[3.0, 46.0], [18.0, 46.0], [18.0, 54.5], [14.2, 53.9], [10.9, 54.0],
             [8.9, 53.9], [3.0, 53.3], [3.0, 46.0]],
            [[9.2, 47.5], [9.7, 47.5], [9.7, 47.7], [9.2, 47.7], [9.2, 47.5]]
        ]
    }))])
}

pub fn coastline_geojson() -> Value {
    collection(vec![
        feature(json!({
            "type": "LineString",
            "coordinates": [[3.0, 53.3], [8.9, 53.9], [8.6, 57.0]]
        })),
        feature(json!({
            "type": "LineString",
            "coordinates": [[10.9, 54.0], [14.2, 53.9], [17.5, 54.6]]
        })),
    ])
}

pub fn borders_geojson() -> Value {
    collection(vec![feature(json!({
        "type": "MultiLineString",
        "coordinates": [
            [[6.0, 53.4], [7.0, 52.2], [6.0, 50.8], [6.4, 49.5]],
            [[14.2, 53.9], [14.6, 52.6], [15.0, 51.0], [12.1, 50.3], [13.8, 48.8], [13.0, 47.5]],
            [[6.4, 49.5], [7.6, 47.6], [9.6, 47.5], [13.0, 47.5]]
        ]
    }))])
}

/// Write all four layers into `dir` under the names the renderer looks for.
pub fn write_feature_layers(dir: &Path) -> io::Result<()> {
    let layers = [
        ("ocean.geojson", ocean_geojson()),
        ("land.geojson", land_geojson()),
        ("coastline.geojson", coastline_geojson()),
        ("borders.geojson", borders_geojson()),
    ];
    for (name, value) in layers {
        std::fs::write(dir.join(name), value.to_string())?;
    }
    Ok(())
}

/// A temporary directory holding all four feature layers.
///
/// Panics if the directory cannot be written; this is test-only code.
pub fn feature_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp feature dir");
    write_feature_layers(dir.path()).expect("write feature layers");
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_dir_has_all_layers() {
        let dir = feature_dir();
        for name in ["ocean", "land", "coastline", "borders"] {
            let path = dir.path().join(format!("{}.geojson", name));
            let text = std::fs::read_to_string(&path).unwrap();
            let value: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(value["type"], "FeatureCollection");
        }
    }
}
