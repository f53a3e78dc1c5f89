//! Axes furniture: gridlines, frame, tick labels and axis titles.

use map_common::{Color, MapResult};
use projection::{PixelRect, Projection, Viewport};
use tiny_skia::{Mask, PathBuilder, Transform};

use crate::figure::{dash_pattern, solid_paint, stroke, Canvas};
use crate::text::{FontSet, HAlign, TextStyle, VAlign};

/// Upper bound on ticks per axis.
pub const MAX_TICKS: usize = 8;

const TICK_FONT_PT: f32 = 10.0;
const TICK_LENGTH_PT: f32 = 3.5;
const TICK_PAD_PT: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Longitude,
    Latitude,
}

/// How tick values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Bare numbers: `10`, `53.6`
    Plain,
    /// Degrees with hemisphere: `10°E`, `53.6°N`
    Degrees,
}

/// Evenly spaced "round" tick values covering `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    if !(max > min) || max_ticks == 0 {
        return Vec::new();
    }
    let step = nice_step((max - min) / max_ticks as f64);
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Smallest step from the 1-2-2.5-5 series not below `raw`.
pub fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

/// Decimal places needed to print multiples of `step` exactly.
pub fn decimals_for(step: f64) -> usize {
    (0..=6)
        .find(|d| {
            let scaled = step * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6)
}

pub fn format_tick(value: f64, decimals: usize, axis: Axis, format: TickFormat) -> String {
    // Avoid "-0"
    let value = if value.abs() < 1e-12 { 0.0 } else { value };
    match format {
        TickFormat::Plain => format!("{:.*}", decimals, value),
        TickFormat::Degrees => {
            let magnitude = format!("{:.*}", decimals, value.abs());
            let hemisphere = match (axis, value.partial_cmp(&0.0)) {
                (_, Some(std::cmp::Ordering::Equal)) => "",
                (Axis::Longitude, Some(std::cmp::Ordering::Greater)) => "E",
                (Axis::Longitude, _) => "W",
                (Axis::Latitude, Some(std::cmp::Ordering::Greater)) => "N",
                (Axis::Latitude, _) => "S",
            };
            format!("{}°{}", magnitude, hemisphere)
        }
    }
}

/// Gridline appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub color: Color,
    pub width_pt: f32,
    pub alpha: f32,
    pub dashed: bool,
}

impl GridStyle {
    /// Cartesian grid of the basic backend.
    pub fn basic() -> Self {
        Self {
            color: Color::rgb(176, 176, 176),
            width_pt: 0.8,
            alpha: 0.3,
            dashed: true,
        }
    }

    /// Graticule of the enhanced backend.
    pub fn enhanced() -> Self {
        Self {
            color: Color::GRAY,
            width_pt: 0.5,
            alpha: 0.5,
            dashed: true,
        }
    }
}

/// Tick positions (in degrees) for both axes of a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub decimals: usize,
}

impl Ticks {
    pub fn for_extent(extent: &map_common::BoundingBox) -> Self {
        let lon = nice_ticks(extent.min_x, extent.max_x, MAX_TICKS);
        let lat = nice_ticks(extent.min_y, extent.max_y, MAX_TICKS);
        let step = |v: &[f64]| if v.len() > 1 { v[1] - v[0] } else { 1.0 };
        let decimals = decimals_for(step(&lon)).max(decimals_for(step(&lat)));
        Self { lon, lat, decimals }
    }
}

/// Draw dashed gridlines through every tick, clipped by `mask`.
pub fn draw_grid<P: Projection>(
    canvas: &mut Canvas,
    viewport: &Viewport<P>,
    ticks: &Ticks,
    style: &GridStyle,
    mask: &Mask,
) -> MapResult<()> {
    let rect = viewport.rect;
    let paint = solid_paint(style.color.with_alpha(style.alpha));
    let line = stroke(
        canvas.pt(style.width_pt),
        style.dashed.then(|| dash_pattern(canvas, style.width_pt)),
    );

    let mut pb = PathBuilder::new();
    for &lon in &ticks.lon {
        let (x, _) = viewport.to_pixel(lon, 0.0);
        pb.move_to(x, rect.y);
        pb.line_to(x, rect.bottom());
    }
    for &lat in &ticks.lat {
        let (_, y) = viewport.to_pixel(viewport.extent.min_x, lat);
        pb.move_to(rect.x, y);
        pb.line_to(rect.right(), y);
    }

    if let Some(path) = pb.finish() {
        canvas
            .pixmap()?
            .stroke_path(&path, &paint, &line, Transform::identity(), Some(mask));
    }
    Ok(())
}

/// Black outline around the axes.
pub fn draw_frame(canvas: &mut Canvas, rect: PixelRect) -> MapResult<()> {
    let line = stroke(canvas.pt(0.8), None);
    if let Some(r) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
        let path = PathBuilder::from_rect(r);
        let paint = solid_paint(Color::BLACK);
        canvas
            .pixmap()?
            .stroke_path(&path, &paint, &line, Transform::identity(), None);
    }
    Ok(())
}

/// Tick marks (optional) and tick labels along the bottom and left edges.
///
/// Returns how far the labels reach outside the axes: (below, left) in px.
pub fn draw_tick_labels<P: Projection>(
    canvas: &mut Canvas,
    fonts: &FontSet,
    viewport: &Viewport<P>,
    ticks: &Ticks,
    format: TickFormat,
    tick_marks: bool,
) -> MapResult<(f32, f32)> {
    let rect = viewport.rect;
    let style = TextStyle::new(TICK_FONT_PT);
    let mark = if tick_marks { canvas.pt(TICK_LENGTH_PT) } else { 0.0 };
    let pad = mark + canvas.pt(TICK_PAD_PT);

    if tick_marks {
        let mut pb = PathBuilder::new();
        for &lon in &ticks.lon {
            let (x, _) = viewport.to_pixel(lon, 0.0);
            pb.move_to(x, rect.bottom());
            pb.line_to(x, rect.bottom() + mark);
        }
        for &lat in &ticks.lat {
            let (_, y) = viewport.to_pixel(viewport.extent.min_x, lat);
            pb.move_to(rect.x, y);
            pb.line_to(rect.x - mark, y);
        }
        if let Some(path) = pb.finish() {
            let paint = solid_paint(Color::BLACK);
            let line = stroke(canvas.pt(0.8), None);
            canvas
                .pixmap()?
                .stroke_path(&path, &paint, &line, Transform::identity(), None);
        }
    }

    let mut below: f32 = 0.0;
    for &lon in &ticks.lon {
        let (x, _) = viewport.to_pixel(lon, 0.0);
        let text = format_tick(lon, ticks.decimals, Axis::Longitude, format);
        let r = fonts.draw(
            canvas,
            &text,
            x,
            rect.bottom() + pad,
            &style,
            HAlign::Center,
            VAlign::Top,
        );
        below = below.max(r.bottom() - rect.bottom());
    }

    let mut left: f32 = 0.0;
    for &lat in &ticks.lat {
        let (_, y) = viewport.to_pixel(viewport.extent.min_x, lat);
        let text = format_tick(lat, ticks.decimals, Axis::Latitude, format);
        let r = fonts.draw(
            canvas,
            &text,
            rect.x - pad,
            y,
            &style,
            HAlign::Right,
            VAlign::Center,
        );
        left = left.max(rect.x - r.x);
    }

    Ok((below, left))
}

/// Axis titles below and (rotated) left of the tick labels.
pub fn draw_axis_titles(
    canvas: &mut Canvas,
    fonts: &FontSet,
    rect: PixelRect,
    reach: (f32, f32),
    x_title: &str,
    y_title: &str,
    size_pt: f32,
) {
    let style = TextStyle::new(size_pt);
    let pad = canvas.pt(4.0);
    fonts.draw(
        canvas,
        x_title,
        rect.center_x(),
        rect.bottom() + reach.0 + pad,
        &style,
        HAlign::Center,
        VAlign::Top,
    );

    let (_, ascent, descent) = fonts.measure(y_title, &style, canvas);
    let cx = rect.x - reach.1 - pad - (ascent + descent) / 2.0;
    fonts.draw_vertical(canvas, y_title, cx, rect.y + rect.height / 2.0, &style);
}
