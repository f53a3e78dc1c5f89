//! Mapping from a projected extent onto a pixel rectangle.

use map_common::BoundingBox;

use crate::Projection;

/// Axis-aligned rectangle in canvas pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A projected extent framed into a pixel rectangle.
///
/// Built with [`Viewport::fit`], the scale is the same on both axes, so a
/// degree of longitude is as long as a degree of latitude.
#[derive(Debug, Clone, Copy)]
pub struct Viewport<P: Projection> {
    pub projection: P,
    /// Extent in projected coordinates
    pub extent: BoundingBox,
    pub rect: PixelRect,
}

impl<P: Projection> Viewport<P> {
    /// Frame `extent` (geographic) inside `available`, keeping equal aspect.
    ///
    /// The result is centred horizontally and anchored to the top of the
    /// available space so a title above it stays close.
    pub fn fit(projection: P, extent: &BoundingBox, available: PixelRect) -> Self {
        let (min_x, min_y) = projection.project(extent.min_x, extent.min_y);
        let (max_x, max_y) = projection.project(extent.max_x, extent.max_y);
        let projected = BoundingBox::new(min_x, min_y, max_x, max_y);

        let scale = (available.width as f64 / projected.width())
            .min(available.height as f64 / projected.height());
        let width = (projected.width() * scale) as f32;
        let height = (projected.height() * scale) as f32;

        let rect = PixelRect::new(
            available.x + (available.width - width) / 2.0,
            available.y,
            width,
            height,
        );

        Self {
            projection,
            extent: projected,
            rect,
        }
    }

    /// Pixels per projected unit along x.
    pub fn scale_x(&self) -> f64 {
        self.rect.width as f64 / self.extent.width()
    }

    /// Pixels per projected unit along y.
    pub fn scale_y(&self) -> f64 {
        self.rect.height as f64 / self.extent.height()
    }

    /// Geographic degrees to canvas pixels.
    pub fn to_pixel(&self, lon: f64, lat: f64) -> (f32, f32) {
        let (x, y) = self.projection.project(lon, lat);
        let px = self.rect.x as f64 + (x - self.extent.min_x) * self.scale_x();
        let py = self.rect.y as f64 + (self.extent.max_y - y) * self.scale_y();
        (px as f32, py as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlateCarree;

    #[test]
    fn test_fit_keeps_equal_aspect() {
        let extent = BoundingBox::new(5.0, 47.0, 15.0, 56.0);
        let available = PixelRect::new(0.0, 0.0, 1000.0, 1000.0);
        let vp = Viewport::fit(PlateCarree::default(), &extent, available);

        assert!((vp.scale_x() - vp.scale_y()).abs() < 1e-3);
        assert_eq!(vp.rect.width, 1000.0);
        assert!((vp.rect.height - 900.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_centres_horizontally() {
        let extent = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let available = PixelRect::new(0.0, 10.0, 300.0, 100.0);
        let vp = Viewport::fit(PlateCarree::default(), &extent, available);

        assert_eq!(vp.rect.width, 100.0);
        assert_eq!(vp.rect.x, 100.0);
        assert_eq!(vp.rect.y, 10.0);
    }

    #[test]
    fn test_corners_map_to_rect_corners() {
        let extent = BoundingBox::new(5.0, 47.0, 15.0, 56.0);
        let available = PixelRect::new(50.0, 20.0, 1000.0, 900.0);
        let vp = Viewport::fit(PlateCarree::default(), &extent, available);

        let (x0, y0) = vp.to_pixel(5.0, 56.0);
        assert!((x0 - 50.0).abs() < 1e-3 && (y0 - 20.0).abs() < 1e-3);

        let (x1, y1) = vp.to_pixel(15.0, 47.0);
        assert!((x1 - vp.rect.right()).abs() < 1e-3);
        assert!((y1 - vp.rect.bottom()).abs() < 1e-3);
    }

    #[test]
    fn test_extent_centre_maps_to_rect_centre() {
        let extent = BoundingBox::centered(9.9937, 53.5511, 0.35, 0.25);
        let available = PixelRect::new(0.0, 0.0, 700.0, 500.0);
        let vp = Viewport::fit(PlateCarree::default(), &extent, available);

        let (px, py) = vp.to_pixel(9.9937, 53.5511);
        assert!((px - vp.rect.center_x()).abs() < 1e-2);
        assert!((py - (vp.rect.y + vp.rect.height / 2.0)).abs() < 1e-2);
    }
}
