//! Scatter markers, route lines and annotation arrows.

use map_common::{Color, MapResult, MarkerShape, MarkerStyle};
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};

use crate::figure::{dash_pattern, solid_paint, stroke, Canvas};

/// Outline of a marker of `extent` pixels centred on `(cx, cy)`.
///
/// All shapes fit a square of side `extent`, matching how matplotlib
/// normalises its `o`, `s` and `^` markers.
pub fn marker_path(shape: MarkerShape, cx: f32, cy: f32, extent: f32) -> Option<Path> {
    let half = extent / 2.0;
    match shape {
        MarkerShape::Circle => PathBuilder::from_circle(cx, cy, half),
        MarkerShape::Square => {
            tiny_skia::Rect::from_xywh(cx - half, cy - half, extent, extent)
                .map(PathBuilder::from_rect)
        }
        MarkerShape::Triangle => {
            let mut pb = PathBuilder::new();
            pb.move_to(cx, cy - half);
            pb.line_to(cx + half, cy + half);
            pb.line_to(cx - half, cy + half);
            pb.close();
            pb.finish()
        }
    }
}

/// Draw one marker; alpha applies to both face and edge.
pub fn draw_marker(canvas: &mut Canvas, style: &MarkerStyle, cx: f32, cy: f32) -> MapResult<()> {
    let extent = canvas.pt(style.extent_pt());
    let edge_width = canvas.pt(style.edge_width);

    let Some(path) = marker_path(style.shape, cx, cy, extent) else {
        return Ok(());
    };

    let mut pixmap = canvas.pixmap()?;
    pixmap.fill_path(
        &path,
        &solid_paint(style.color.with_alpha(style.alpha)),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    if edge_width > 0.0 {
        pixmap.stroke_path(
            &path,
            &solid_paint(style.edge_color.with_alpha(style.alpha)),
            &stroke(edge_width, None),
            Transform::identity(),
            None,
        );
    }
    Ok(())
}

/// Line appearance for routes and legend line handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width_pt: f32,
    pub alpha: f32,
    pub dashed: bool,
}

impl LineStyle {
    /// The blue dashed supply route line.
    pub fn route() -> Self {
        Self {
            color: Color::BLUE,
            width_pt: 1.5,
            alpha: 0.5,
            dashed: true,
        }
    }
}

/// Draw a straight line between two pixel positions.
pub fn draw_line(
    canvas: &mut Canvas,
    style: &LineStyle,
    from: (f32, f32),
    to: (f32, f32),
    mask: Option<&Mask>,
) -> MapResult<()> {
    let width = canvas.pt(style.width_pt);
    let dash = style.dashed.then(|| dash_pattern(canvas, style.width_pt));

    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);

    if let Some(path) = pb.finish() {
        canvas.pixmap()?.stroke_path(
            &path,
            &solid_paint(style.color.with_alpha(style.alpha)),
            &stroke(width, dash),
            Transform::identity(),
            mask,
        );
    }
    Ok(())
}

/// Curved `->` arrow from `from` to `to`.
///
/// The curve is a quadratic through a control point displaced from the
/// chord midpoint by `rad` times the chord length (matplotlib's `arc3`).
/// The tip stops `shrink` pixels short of `to`.
pub fn draw_arrow(
    canvas: &mut Canvas,
    from: (f32, f32),
    to: (f32, f32),
    rad: f32,
    style: &LineStyle,
    shrink: f32,
) -> MapResult<()> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= shrink + 1.0 {
        return Ok(());
    }

    // arc3 in a y-up frame, so the perpendicular flips sign on canvas y
    let control = (from.0 + dx / 2.0 - rad * dy, from.1 + dy / 2.0 + rad * dx);

    // Pull the tip back along the curve's end tangent
    let (tx, ty) = (to.0 - control.0, to.1 - control.1);
    let tangent_len = (tx * tx + ty * ty).sqrt().max(f32::EPSILON);
    let (ux, uy) = (tx / tangent_len, ty / tangent_len);
    let tip = (to.0 - ux * shrink, to.1 - uy * shrink);

    let width = canvas.pt(style.width_pt);
    let head = width * 5.0;
    let paint = solid_paint(style.color.with_alpha(style.alpha));
    let line = stroke(width, None);

    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.quad_to(control.0, control.1, tip.0, tip.1);
    // Open head: two barbs 30° either side of the tangent
    let (cos, sin) = (30f32.to_radians().cos(), 30f32.to_radians().sin());
    let back = (-ux, -uy);
    let left = (back.0 * cos - back.1 * sin, back.0 * sin + back.1 * cos);
    let right = (back.0 * cos + back.1 * sin, -back.0 * sin + back.1 * cos);
    pb.move_to(tip.0 + left.0 * head, tip.1 + left.1 * head);
    pb.line_to(tip.0, tip.1);
    pb.line_to(tip.0 + right.0 * head, tip.1 + right.1 * head);

    if let Some(path) = pb.finish() {
        canvas.pixmap()?.stroke_path(&path, &paint, &line, Transform::identity(), None);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_pixels(canvas: &Canvas) -> usize {
        canvas
            .image()
            .pixels()
            .filter(|p| p.0[0] < 250 || p.0[2] < 250)
            .count()
    }

    #[test]
    fn test_marker_paths_fit_extent() {
        for shape in [
            MarkerShape::Circle,
            MarkerShape::Square,
            MarkerShape::Triangle,
        ] {
            let path = marker_path(shape, 50.0, 50.0, 20.0).unwrap();
            let b = path.bounds();
            assert!(b.left() >= 39.9 && b.right() <= 60.1, "{:?}", shape);
            assert!(b.top() >= 39.9 && b.bottom() <= 60.1, "{:?}", shape);
        }
    }

    #[test]
    fn test_draw_marker_colors_center() {
        let mut canvas = Canvas::new(1.0, 1.0, 100, Color::WHITE).unwrap();
        let style = MarkerStyle::new(Color::RED, MarkerShape::Square, 400.0);
        draw_marker(&mut canvas, &style, 50.0, 50.0).unwrap();

        let center = canvas.image().get_pixel(50, 50).0;
        // 70% red over white
        assert_eq!(center[0], 255);
        assert!(center[1] > 60 && center[1] < 100);
        assert_eq!(canvas.image().get_pixel(2, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_draw_line_respects_mask() {
        let mut canvas = Canvas::new(1.0, 1.0, 100, Color::WHITE).unwrap();
        let mask = canvas.clip_mask(projection::PixelRect::new(0.0, 0.0, 50.0, 100.0)).unwrap();
        draw_line(
            &mut canvas,
            &LineStyle::route(),
            (0.0, 50.0),
            (100.0, 50.0),
            Some(&mask),
        ).unwrap();

        let right_half_touched = canvas
            .image()
            .enumerate_pixels()
            .any(|(x, _, p)| x > 55 && p.0 != [255, 255, 255, 255]);
        assert!(!right_half_touched);
        assert!(dark_pixels(&canvas) > 0);
    }

    #[test]
    fn test_draw_arrow_skips_degenerate() {
        let mut canvas = Canvas::new(1.0, 1.0, 100, Color::WHITE).unwrap();
        let style = LineStyle { dashed: false, ..LineStyle::route() };
        draw_arrow(&mut canvas, (10.0, 10.0), (10.5, 10.5), 0.2, &style, 2.0).unwrap();
        assert_eq!(dark_pixels(&canvas), 0);

        draw_arrow(&mut canvas, (10.0, 10.0), (80.0, 60.0), 0.2, &style, 2.0).unwrap();
        assert!(dark_pixels(&canvas) > 0);
    }
}
