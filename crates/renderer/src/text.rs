//! Text layout and drawing.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use map_common::{Color, Label, MapError, MapResult};
use projection::PixelRect;
use rusttype::{point, Font, GlyphId, Scale};
use std::path::Path;
use tiny_skia::{FillRule, Path as SkPath, PathBuilder, Transform};

use crate::figure::{solid_paint, stroke, Canvas};

/// Embedded font data - DejaVu Sans (covers Latin incl. umlauts, no CJK)
const REGULAR_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const BOLD_FONT: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Size, weight and color of a piece of text.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size_pt: f32,
    pub weight: FontWeight,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size_pt: f32) -> Self {
        Self {
            size_pt,
            weight: FontWeight::Regular,
            color: Color::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }
}

/// Fonts used for all map text.
pub struct FontSet {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl FontSet {
    /// The fonts compiled into the binary.
    pub fn embedded() -> MapResult<Self> {
        let regular = Font::try_from_bytes(REGULAR_FONT)
            .ok_or_else(|| MapError::FontError("embedded regular font is invalid".to_string()))?;
        let bold = Font::try_from_bytes(BOLD_FONT)
            .ok_or_else(|| MapError::FontError("embedded bold font is invalid".to_string()))?;
        Ok(Self { regular, bold })
    }

    /// Load a TrueType font from disk and use it for every weight.
    pub fn from_file(path: &Path) -> MapResult<Self> {
        let data = std::fs::read(path)?;
        let font = Font::try_from_vec(data).ok_or_else(|| {
            MapError::FontError(format!("{} is not a usable TrueType font", path.display()))
        })?;
        Ok(Self {
            regular: font.clone(),
            bold: font,
        })
    }

    pub fn font(&self, weight: FontWeight) -> &Font<'static> {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    /// True when every visible character of `text` has a glyph in all weights.
    pub fn supports(&self, text: &str) -> bool {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| has_glyph(&self.regular, c) && has_glyph(&self.bold, c))
    }

    /// Join the translations of `label` this font set can draw.
    pub fn render_label(&self, label: &Label) -> String {
        let text = label.render(|t| self.supports(t));
        if text != label.full() {
            tracing::debug!(
                label = %label.full(),
                shown = %text,
                "Dropped translations without glyphs"
            );
        }
        text
    }

    /// Size of `text` in pixels: (width, ascent, descent below baseline).
    pub fn measure(&self, text: &str, style: &TextStyle, canvas: &Canvas) -> (f32, f32, f32) {
        let font = self.font(style.weight);
        let scale = Scale::uniform(canvas.pt(style.size_pt));
        let v_metrics = font.v_metrics(scale);

        let width = font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .fold(0.0_f32, f32::max);

        (width, v_metrics.ascent, -v_metrics.descent)
    }

    /// Rectangle `text` occupies when anchored at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn text_rect(
        &self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        canvas: &Canvas,
        halign: HAlign,
        valign: VAlign,
    ) -> PixelRect {
        let (width, ascent, descent) = self.measure(text, style, canvas);
        let height = ascent + descent;
        let left = match halign {
            HAlign::Left => x,
            HAlign::Center => x - width / 2.0,
            HAlign::Right => x - width,
        };
        let top = match valign {
            VAlign::Top => y,
            VAlign::Center => y - height / 2.0,
            VAlign::Bottom => y - height,
        };
        PixelRect::new(left, top, width, height)
    }

    /// Draw `text` anchored at `(x, y)` and return the rectangle it covers.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        halign: HAlign,
        valign: VAlign,
    ) -> PixelRect {
        let rect = self.text_rect(text, x, y, style, canvas, halign, valign);
        let scale = Scale::uniform(canvas.pt(style.size_pt));
        draw_text_mut(
            canvas.image_mut(),
            Rgba(style.color.to_array()),
            rect.x.round() as i32,
            rect.y.round() as i32,
            scale,
            self.font(style.weight),
            text,
        );
        rect
    }

    /// Draw `text` rotated 90° counter-clockwise, centred on `(cx, cy)`.
    pub fn draw_vertical(
        &self,
        canvas: &mut Canvas,
        text: &str,
        cx: f32,
        cy: f32,
        style: &TextStyle,
    ) {
        let (width, ascent, descent) = self.measure(text, style, canvas);
        let w = width.ceil().max(1.0) as u32;
        let h = (ascent + descent).ceil().max(1.0) as u32;

        // Transparent pixels carry the text color, so alpha alone holds coverage
        let [r, g, b, _] = style.color.to_array();
        let mut strip = RgbaImage::from_pixel(w, h, Rgba([r, g, b, 0]));
        draw_text_mut(
            &mut strip,
            Rgba(style.color.to_array()),
            0,
            0,
            Scale::uniform(canvas.pt(style.size_pt)),
            self.font(style.weight),
            text,
        );

        let rotated = imageops::rotate270(&strip);
        let x0 = (cx - h as f32 / 2.0).round() as i64;
        let y0 = (cy - w as f32 / 2.0).round() as i64;

        // Blend coverage by hand so the canvas stays exactly opaque
        let image = canvas.image_mut();
        let (cw, ch) = (image.width() as i64, image.height() as i64);
        for (sx, sy, src) in rotated.enumerate_pixels() {
            let (x, y) = (x0 + sx as i64, y0 + sy as i64);
            if src.0[3] == 0 || x < 0 || y < 0 || x >= cw || y >= ch {
                continue;
            }
            let coverage = src.0[3] as f32 / 255.0;
            let dst = image.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                let blended = dst.0[c] as f32 * (1.0 - coverage) + src.0[c] as f32 * coverage;
                dst.0[c] = blended.round() as u8;
            }
        }
    }
}

fn has_glyph(font: &Font<'_>, c: char) -> bool {
    font.glyph(c).id() != GlyphId(0)
}

/// Rounded box drawn behind labels (matplotlib's `boxstyle='round'`).
#[derive(Debug, Clone, Copy)]
pub struct LabelBox {
    /// Padding around the text in units of the font size
    pub pad: f32,
    pub face: Color,
    pub edge: Color,
    pub alpha: f32,
}

impl LabelBox {
    pub fn new(pad: f32, alpha: f32) -> Self {
        Self {
            pad,
            face: Color::WHITE,
            edge: Color::BLACK,
            alpha,
        }
    }

    /// The box around `text_rect` for text of `style`.
    pub fn outer_rect(
        &self,
        text_rect: PixelRect,
        style: &TextStyle,
        canvas: &Canvas,
    ) -> PixelRect {
        let pad = canvas.pt(style.size_pt * self.pad);
        PixelRect::new(
            text_rect.x - pad,
            text_rect.y - pad,
            text_rect.width + 2.0 * pad,
            text_rect.height + 2.0 * pad,
        )
    }

    /// Fill and outline the box around `text_rect`.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text_rect: PixelRect,
        style: &TextStyle,
    ) -> MapResult<PixelRect> {
        let outer = self.outer_rect(text_rect, style, canvas);
        let radius = canvas.pt(style.size_pt * self.pad);
        let line_width = canvas.pt(1.0);

        if let Some(path) = rounded_rect(outer, radius) {
            let mut pixmap = canvas.pixmap()?;
            pixmap.fill_path(
                &path,
                &solid_paint(self.face.with_alpha(self.alpha)),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            pixmap.stroke_path(
                &path,
                &solid_paint(self.edge.with_alpha(self.alpha)),
                &stroke(line_width, None),
                Transform::identity(),
                None,
            );
        }
        Ok(outer)
    }
}

/// Rectangle path with quadratic corners of `radius` pixels.
pub fn rounded_rect(rect: PixelRect, radius: f32) -> Option<SkPath> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.quad_to(x1, y0, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.quad_to(x1, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.quad_to(x0, y1, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.quad_to(x0, y0, x0 + r, y0);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(4.0, 2.0, 72, Color::WHITE).unwrap()
    }

    #[test]
    fn test_embedded_fonts_load() {
        assert!(FontSet::embedded().is_ok());
    }

    #[test]
    fn test_supports_latin_not_cjk() {
        let fonts = FontSet::embedded().unwrap();
        assert!(fonts.supports("Längengrad"));
        assert!(!fonts.supports("经度"));
    }

    #[test]
    fn test_render_label_drops_cjk() {
        let fonts = FontSet::embedded().unwrap();
        let label = Label::new("Longitude").de("Längengrad").zh("经度");
        assert_eq!(fonts.render_label(&label), "Longitude / Längengrad");
    }

    #[test]
    fn test_measure_grows_with_text() {
        let fonts = FontSet::embedded().unwrap();
        let canvas = canvas();
        let style = TextStyle::new(10.0);
        let (short, ascent, descent) = fonts.measure("Berlin", &style, &canvas);
        let (long, _, _) = fonts.measure("Berlin Berlin", &style, &canvas);
        assert!(short > 0.0);
        assert!(long > short * 1.5);
        assert!(ascent > 0.0 && descent >= 0.0);
    }

    #[test]
    fn test_text_rect_alignment() {
        let fonts = FontSet::embedded().unwrap();
        let canvas = canvas();
        let style = TextStyle::new(10.0);
        let left = fonts.text_rect(
            "Munich",
            100.0,
            50.0,
            &style,
            &canvas,
            HAlign::Left,
            VAlign::Bottom,
        );
        let right = fonts.text_rect(
            "Munich",
            100.0,
            50.0,
            &style,
            &canvas,
            HAlign::Right,
            VAlign::Top,
        );

        assert_eq!(left.x, 100.0);
        assert!((left.bottom() - 50.0).abs() < 1e-3);
        assert!((right.right() - 100.0).abs() < 1e-3);
        assert_eq!(right.y, 50.0);
    }

    #[test]
    fn test_draw_marks_pixels() {
        let fonts = FontSet::embedded().unwrap();
        let mut canvas = canvas();
        let rect = fonts.draw(
            &mut canvas,
            "Hamburg",
            10.0,
            10.0,
            &TextStyle::new(12.0),
            HAlign::Left,
            VAlign::Top,
        );
        let dark = canvas.image().pixels().filter(|p| p.0[0] < 128).count();
        assert!(dark > 0);
        assert!(rect.width > 0.0);
    }

    #[test]
    fn test_draw_vertical_marks_pixels() {
        let fonts = FontSet::embedded().unwrap();
        let mut canvas = canvas();
        fonts.draw_vertical(&mut canvas, "Latitude", 20.0, 72.0, &TextStyle::new(12.0));
        let dark: Vec<_> = canvas
            .image()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] < 128)
            .map(|(x, _, _)| x)
            .collect();
        assert!(!dark.is_empty());
        // Rotated text is narrow around its centre column
        assert!(dark.iter().all(|&x| x < 40));
    }

    #[test]
    fn test_rounded_rect_path() {
        let rect = PixelRect::new(0.0, 0.0, 20.0, 10.0);
        assert!(rounded_rect(rect, 3.0).is_some());
    }
}
