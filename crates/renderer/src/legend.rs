//! Map legends.

use map_common::{Color, Label, MapResult, MarkerStyle};
use projection::PixelRect;
use tiny_skia::{FillRule, Transform};

use crate::figure::{solid_paint, stroke, Canvas};
use crate::markers::{draw_line, draw_marker, LineStyle};
use crate::text::{rounded_rect, FontSet, HAlign, TextStyle, VAlign};

/// Spacing parameters, in units of the entry font size.
const BORDER_AXES_PAD: f32 = 0.5;
const BORDER_PAD: f32 = 0.4;
const HANDLE_LENGTH: f32 = 2.0;
const HANDLE_TEXT_PAD: f32 = 0.8;
const LABEL_SPACING: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum LegendSymbol {
    Marker(MarkerStyle),
    Line(LineStyle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub symbol: LegendSymbol,
    pub label: Label,
}

impl LegendEntry {
    pub fn marker(style: MarkerStyle, label: Label) -> Self {
        Self {
            symbol: LegendSymbol::Marker(style),
            label,
        }
    }

    pub fn line(style: LineStyle, label: Label) -> Self {
        Self {
            symbol: LegendSymbol::Line(style),
            label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperLeft,
    UpperRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: Label,
    pub entries: Vec<LegendEntry>,
    pub corner: LegendCorner,
    pub font_pt: f32,
    pub title_font_pt: f32,
    pub frame_alpha: f32,
}

impl Legend {
    pub fn new(
        title: Label,
        corner: LegendCorner,
        entries: Vec<LegendEntry>,
    ) -> Self {
        Self {
            title,
            entries,
            corner,
            font_pt: 9.0,
            title_font_pt: 10.0,
            frame_alpha: 0.9,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw the legend inside the `axes` corner and return its frame.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        fonts: &FontSet,
        axes: PixelRect,
    ) -> MapResult<PixelRect> {
        let em = canvas.pt(self.font_pt);
        let entry_style = TextStyle::new(self.font_pt);
        let title_style = TextStyle::new(self.title_font_pt);

        let title = fonts.render_label(&self.title);
        let labels: Vec<String> = self
            .entries
            .iter()
            .map(|e| fonts.render_label(&e.label))
            .collect();

        // Row geometry
        let (title_w, title_a, title_d) = fonts.measure(&title, &title_style, canvas);
        let handle_w = (HANDLE_LENGTH * em).max(self.max_marker_px(canvas));
        let rows: Vec<(f32, f32)> = labels
            .iter()
            .zip(&self.entries)
            .map(|(text, entry)| {
                let (w, a, d) = fonts.measure(text, &entry_style, canvas);
                let symbol_h = match &entry.symbol {
                    LegendSymbol::Marker(m) => canvas.pt(m.extent_pt()),
                    LegendSymbol::Line(_) => 0.0,
                };
                (w, (a + d).max(symbol_h))
            })
            .collect();

        let content_w = rows
            .iter()
            .map(|(w, _)| handle_w + HANDLE_TEXT_PAD * em + w)
            .fold(title_w, f32::max);
        let content_h = title_a
            + title_d
            + rows.iter().map(|(_, h)| h + LABEL_SPACING * em).sum::<f32>();

        let pad = BORDER_PAD * em;
        let width = content_w + 2.0 * pad;
        let height = content_h + 2.0 * pad;
        let inset = BORDER_AXES_PAD * em;
        let x = match self.corner {
            LegendCorner::UpperLeft => axes.x + inset,
            LegendCorner::UpperRight => axes.right() - inset - width,
        };
        let frame = PixelRect::new(x, axes.y + inset, width, height);

        // Frame
        if let Some(path) = rounded_rect(frame, pad) {
            let edge_width = canvas.pt(0.8);
            let mut pixmap = canvas.pixmap()?;
            pixmap.fill_path(
                &path,
                &solid_paint(Color::WHITE.with_alpha(self.frame_alpha)),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            pixmap.stroke_path(
                &path,
                &solid_paint(Color::rgb(204, 204, 204).with_alpha(self.frame_alpha)),
                &stroke(edge_width, None),
                Transform::identity(),
                None,
            );
        }

        // Title, then one row per entry
        let mut y = frame.y + pad;
        fonts.draw(
            canvas,
            &title,
            frame.center_x(),
            y,
            &title_style,
            HAlign::Center,
            VAlign::Top,
        );
        y += title_a + title_d + LABEL_SPACING * em;

        for ((entry, text), (_, row_h)) in self.entries.iter().zip(&labels).zip(&rows) {
            let cy = y + row_h / 2.0;
            let handle_x = frame.x + pad;
            match &entry.symbol {
                LegendSymbol::Marker(style) => {
                    draw_marker(canvas, style, handle_x + handle_w / 2.0, cy)?;
                }
                LegendSymbol::Line(style) => {
                    draw_line(
                        canvas,
                        style,
                        (handle_x, cy),
                        (handle_x + handle_w, cy),
                        None,
                    )?;
                }
            }
            fonts.draw(
                canvas,
                text,
                handle_x + handle_w + HANDLE_TEXT_PAD * em,
                cy,
                &entry_style,
                HAlign::Left,
                VAlign::Center,
            );
            y += row_h + LABEL_SPACING * em;
        }

        Ok(frame)
    }

    fn max_marker_px(&self, canvas: &Canvas) -> f32 {
        self.entries
            .iter()
            .filter_map(|e| match &e.symbol {
                LegendSymbol::Marker(m) => Some(canvas.pt(m.extent_pt())),
                LegendSymbol::Line(_) => None,
            })
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::MarkerShape;

    fn sample() -> Legend {
        Legend::new(
            Label::new("Legend").de("Legende"),
            LegendCorner::UpperRight,
            vec![
                LegendEntry::marker(
                    MarkerStyle::new(Color::RED, MarkerShape::Circle, 400.0),
                    Label::new("Production Facility"),
                ),
                LegendEntry::line(LineStyle::route(), Label::new("Supply Route")),
            ],
        )
    }

    #[test]
    fn test_legend_len() {
        let legend = sample();
        assert_eq!(legend.len(), 2);
        assert!(!legend.is_empty());
    }

    #[test]
    fn test_legend_upper_right_stays_inside_axes() {
        let fonts = FontSet::embedded().unwrap();
        let mut canvas = Canvas::new(6.0, 4.0, 50, Color::WHITE).unwrap();
        let axes = PixelRect::new(20.0, 20.0, 260.0, 160.0);

        let frame = sample().draw(&mut canvas, &fonts, axes).unwrap();
        assert!(frame.right() <= axes.right());
        assert!(frame.y >= axes.y);
        assert!(frame.x > axes.center_x() - frame.width);
    }

    #[test]
    fn test_legend_upper_left_anchor() {
        let fonts = FontSet::embedded().unwrap();
        let mut canvas = Canvas::new(6.0, 4.0, 50, Color::WHITE).unwrap();
        let axes = PixelRect::new(20.0, 20.0, 260.0, 160.0);

        let mut legend = sample();
        legend.corner = LegendCorner::UpperLeft;
        let frame = legend.draw(&mut canvas, &fonts, axes).unwrap();
        assert!(frame.x > axes.x && frame.x < axes.x + 10.0);
    }
}
