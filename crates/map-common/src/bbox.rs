//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// A geographic bounding box (the map extent).
///
/// Coordinates are longitude (x) and latitude (y) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a box centred on `(x, y)` reaching `half_width` / `half_height`
    /// out on each side.
    pub fn centered(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self::new(
            x - half_width,
            y - half_height,
            x + half_width,
            y + half_height,
        )
    }

    /// Reject boxes that are empty, inverted, or not finite.
    pub fn validate(&self) -> MapResult<()> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(MapError::InvalidExtent(format!("non-finite corner in {:?}", self)));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(MapError::InvalidExtent(format!(
                "[{}, {}] x [{}, {}] has no area",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Smallest box containing all the given points, or `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => BoundingBox::new(x, y, x, y),
                Some(b) => BoundingBox::new(
                    b.min_x.min(x),
                    b.min_y.min(y),
                    b.max_x.max(x),
                    b.max_y.max(y),
                ),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        let bbox = BoundingBox::centered(10.0, 50.0, 0.5, 0.25);
        assert_eq!(bbox.min_x, 9.5);
        assert_eq!(bbox.max_x, 10.5);
        assert_eq!(bbox.min_y, 49.75);
        assert_eq!(bbox.max_y, 50.25);
    }

    #[test]
    fn test_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_validate_rejects_inverted() {
        assert!(BoundingBox::new(10.0, 10.0, 5.0, 5.0).validate().is_err());
        assert!(BoundingBox::new(0.0, 0.0, 0.0, 1.0).validate().is_err());
        let nan = BoundingBox::new(0.0, 0.0, f64::NAN, 1.0);
        assert!(nan.validate().is_err());
        assert!(BoundingBox::new(5.0, 47.0, 15.0, 56.0).validate().is_ok());
    }
}
