//! The raster canvas a map is drawn on.
//!
//! Vector shapes go through tiny-skia and text through imageproc; both
//! operate on the same RGBA buffer. The canvas starts from an opaque
//! background and every draw is composited over it, so the buffer stays
//! fully opaque and tiny-skia's premultiplied view of it is identical to
//! the straight-alpha view imageproc and the PNG encoder use.

use image::{Rgba, RgbaImage};
use map_common::{Color, MapError, MapResult};
use projection::PixelRect;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, PixmapMut, Stroke, StrokeDash, Transform,
};

/// Typographic points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

pub struct Canvas {
    image: RgbaImage,
    dpi: u32,
}

impl Canvas {
    /// Create a canvas of `width_in` x `height_in` inches at `dpi`.
    pub fn new(width_in: f32, height_in: f32, dpi: u32, background: Color) -> MapResult<Self> {
        let width = (width_in * dpi as f32).round() as u32;
        let height = (height_in * dpi as f32).round() as u32;
        if width == 0 || height == 0 {
            return Err(MapError::CanvasError(format!(
                "{}x{} in at {} dpi has no pixels",
                width_in, height_in, dpi
            )));
        }

        let background = Color { a: 255, ..background };
        let image = RgbaImage::from_pixel(width, height, Rgba(background.to_array()));

        Ok(Self { image, dpi })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Convert a length in points to pixels.
    pub fn pt(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH
    }

    /// tiny-skia view over the pixel buffer.
    pub fn pixmap(&mut self) -> MapResult<PixmapMut<'_>> {
        let (width, height) = self.image.dimensions();
        let data: &mut [u8] = &mut self.image;
        PixmapMut::from_bytes(data, width, height).ok_or_else(|| {
            MapError::CanvasError("pixel buffer does not match canvas size".to_string())
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Mask that only lets drawing through inside `rect`.
    pub fn clip_mask(&self, rect: PixelRect) -> MapResult<Mask> {
        let mut mask = Mask::new(self.width(), self.height())
            .ok_or_else(|| MapError::CanvasError("cannot allocate clip mask".to_string()))?;
        let path = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
            .map(PathBuilder::from_rect)
            .ok_or_else(|| MapError::CanvasError(format!("invalid clip rectangle {:?}", rect)))?;
        mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
        Ok(mask)
    }

    /// Fill a pixel rectangle with a (possibly translucent) color.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) -> MapResult<()> {
        let Some(r) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return Ok(());
        };
        let paint = solid_paint(color);
        self.pixmap()?.fill_rect(r, &paint, Transform::identity(), None);
        Ok(())
    }
}

/// Anti-aliased solid paint.
pub fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Stroke of `width` pixels, optionally dashed with `(on, off)` pixel lengths.
pub fn stroke(width: f32, dash: Option<(f32, f32)>) -> Stroke {
    let mut stroke = Stroke::default();
    stroke.width = width;
    stroke.line_cap = LineCap::Butt;
    stroke.line_join = LineJoin::Round;
    stroke.dash = dash.and_then(|(on, off)| StrokeDash::new(vec![on, off], 0.0));
    stroke
}

/// Matplotlib's `--` pattern for a line of `width_pt`: 3.7 on, 1.6 off, in
/// units of the line width.
pub fn dash_pattern(canvas: &Canvas, width_pt: f32) -> (f32, f32) {
    (canvas.pt(3.7 * width_pt), canvas.pt(1.6 * width_pt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_dimensions_follow_dpi() {
        let canvas = Canvas::new(14.0, 10.0, 30, Color::WHITE).unwrap();
        assert_eq!(canvas.width(), 420);
        assert_eq!(canvas.height(), 300);
        assert_eq!(canvas.pt(72.0), 30.0);
    }

    #[test]
    fn test_canvas_rejects_empty() {
        assert!(Canvas::new(0.0, 10.0, 300, Color::WHITE).is_err());
    }

    #[test]
    fn test_background_forced_opaque() {
        let canvas = Canvas::new(1.0, 1.0, 10, Color::rgba(255, 255, 255, 0)).unwrap();
        assert!(canvas.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_rect_blends_over_background() {
        let mut canvas = Canvas::new(1.0, 1.0, 10, Color::WHITE).unwrap();
        let rect = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        canvas.fill_rect(rect, Color::BLACK.with_alpha(0.5)).unwrap();
        let p = canvas.image().get_pixel(5, 5);
        assert_eq!(p.0[3], 255);
        assert!(p.0[0] > 100 && p.0[0] < 160);
    }
}
