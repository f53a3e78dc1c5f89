//! Map documents and their rendering.
//!
//! A [`MapDocument`] is the static description of one figure: framing
//! extent, located markers, routes between them, overlays, legend and
//! title. [`render_map`] turns it into pixels with whichever backend is
//! available. The axes layout does not depend on the backend, so every
//! marker lands on the same pixel whether or not feature layers are drawn.

use std::collections::HashSet;

use map_common::{
    BoundingBox, Color, GeoPoint, Label, LabelPlacement, Location, MapError, MapResult, Route,
};
use projection::{PixelRect, PlateCarree, Viewport};
use tiny_skia::{FillRule, PathBuilder, Transform};

use crate::axes::{self, GridStyle, TickFormat, Ticks};
use crate::backend::{Backend, BackendKind};
use crate::features::LayerKind;
use crate::figure::{solid_paint, stroke, Canvas};
use crate::legend::Legend;
use crate::markers::{draw_arrow, draw_line, draw_marker, LineStyle};
use crate::text::{FontSet, HAlign, LabelBox, TextStyle, VAlign};

// Figure layout, in points
const OUTER_PAD_PT: f32 = 12.0;
const TITLE_FONT_PT: f32 = 14.0;
const TITLE_PAD_PT: f32 = 20.0;
const LEFT_MARGIN_PT: f32 = 72.0;
const RIGHT_MARGIN_PT: f32 = 24.0;
const BOTTOM_MARGIN_PT: f32 = 60.0;

/// Which backend a document wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendPreference {
    /// Use geographic features when the probe found them
    PreferEnhanced,
    /// Always draw the plain grid
    BasicOnly,
}

/// A translucent rectangle patch in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectOverlay {
    /// Lower-left corner
    pub origin: GeoPoint,
    pub width_deg: f64,
    pub height_deg: f64,
    pub face: Color,
    pub edge: Color,
    pub edge_width_pt: f32,
    pub alpha: f32,
}

/// How location names are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub font_pt: f32,
    pub box_pad: f32,
    pub box_alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTitles {
    pub x: Label,
    pub y: Label,
    pub font_pt: f32,
}

/// Everything needed to draw one map.
#[derive(Debug, Clone)]
pub struct MapDocument {
    pub title: Label,
    pub extent: BoundingBox,
    /// Figure width and height in inches
    pub figure_size: (f32, f32),
    pub locations: Vec<Location>,
    pub routes: Vec<Route>,
    pub route_style: LineStyle,
    pub overlays: Vec<RectOverlay>,
    pub labels: LabelStyle,
    pub legend: Legend,
    /// Shown with the basic backend; the enhanced graticule labels itself
    pub axis_titles: AxisTitles,
    pub backend: BackendPreference,
    /// Flat tint behind the whole axes area
    pub background_tint: Option<Color>,
    pub output_file: String,
}

impl MapDocument {
    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.name == name)
    }

    /// Check the extent, that every location lies inside it, and that every
    /// route endpoint names a location.
    pub fn validate(&self) -> MapResult<()> {
        self.extent.validate()?;

        let mut seen = HashSet::new();
        for location in &self.locations {
            if !seen.insert(location.name.as_str()) {
                return Err(MapError::DuplicateLocation(location.name.clone()));
            }
            let GeoPoint { lon, lat } = location.point;
            if !self.extent.contains_point(lon, lat) {
                return Err(MapError::LocationOutOfExtent {
                    name: location.name.clone(),
                    lon,
                    lat,
                });
            }
        }

        self.resolved_routes().map(|_| ())
    }

    /// Each route with its endpoints looked up in the location table.
    pub fn resolved_routes(&self) -> MapResult<Vec<(&Location, &Location)>> {
        self.routes
            .iter()
            .map(|route| {
                let from = self
                    .location(&route.from)
                    .ok_or_else(|| MapError::UnknownRouteEndpoint(route.from.clone()))?;
                let to = self
                    .location(&route.to)
                    .ok_or_else(|| MapError::UnknownRouteEndpoint(route.to.clone()))?;
                Ok((from, to))
            })
            .collect()
    }
}

/// A location's marker position on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedPoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
}

/// The drawn figure plus what went into it.
pub struct RenderedMap {
    pub canvas: Canvas,
    pub backend: BackendKind,
    pub points: Vec<PlottedPoint>,
    pub legend_entries: usize,
    pub layers_drawn: Vec<LayerKind>,
}

/// Draw `doc` at `dpi` using `backend` where the document allows it.
pub fn render_map(
    doc: &MapDocument,
    backend: &Backend,
    fonts: &FontSet,
    dpi: u32,
) -> MapResult<RenderedMap> {
    doc.validate()?;

    let features = match doc.backend {
        BackendPreference::PreferEnhanced => backend.features(),
        BackendPreference::BasicOnly => None,
    };
    let kind = if features.is_some() { BackendKind::Enhanced } else { BackendKind::Basic };

    tracing::debug!(
        title = %doc.title.full(),
        backend = %kind,
        locations = doc.locations.len(),
        routes = doc.routes.len(),
        dpi,
        "Rendering map"
    );

    let (width_in, height_in) = doc.figure_size;
    let mut canvas = Canvas::new(width_in, height_in, dpi, Color::WHITE)?;

    // Layout: title on top, axes framed to the extent with equal aspect
    let title = fonts.render_label(&doc.title);
    let title_style = TextStyle::new(TITLE_FONT_PT).bold();
    let (_, title_ascent, title_descent) = fonts.measure(&title, &title_style, &canvas);
    let top = canvas.pt(OUTER_PAD_PT + TITLE_PAD_PT) + title_ascent + title_descent;
    let left = canvas.pt(LEFT_MARGIN_PT);
    let available = PixelRect::new(
        left,
        top,
        canvas.width() as f32 - left - canvas.pt(RIGHT_MARGIN_PT),
        canvas.height() as f32 - top - canvas.pt(BOTTOM_MARGIN_PT),
    );
    let viewport = Viewport::fit(PlateCarree::default(), &doc.extent, available);
    let axes_rect = viewport.rect;
    let mask = canvas.clip_mask(axes_rect)?;

    if let Some(tint) = doc.background_tint {
        canvas.fill_rect(axes_rect, tint)?;
    }

    // Backdrop
    let mut layers_drawn = Vec::new();
    let ticks = Ticks::for_extent(&doc.extent);
    match features {
        Some(layers) => {
            for layer in layers.iter() {
                let shapes = layer.draw(&mut canvas, &viewport, &doc.extent, &mask)?;
                tracing::debug!(layer = %layer.kind, shapes, "Drew feature layer");
                layers_drawn.push(layer.kind);
            }
            axes::draw_grid(
                &mut canvas,
                &viewport,
                &ticks,
                &GridStyle::enhanced(),
                &mask,
            )?;
        }
        None => {
            axes::draw_grid(&mut canvas, &viewport, &ticks, &GridStyle::basic(), &mask)?;
        }
    }

    for overlay in &doc.overlays {
        draw_overlay(&mut canvas, &viewport, overlay, &mask)?;
    }

    // Routes under markers
    for (from, to) in doc.resolved_routes()? {
        let a = viewport.to_pixel(from.point.lon, from.point.lat);
        let b = viewport.to_pixel(to.point.lon, to.point.lat);
        draw_line(&mut canvas, &doc.route_style, a, b, Some(&mask))?;
    }

    let mut points = Vec::with_capacity(doc.locations.len());
    for location in &doc.locations {
        let (x, y) = viewport.to_pixel(location.point.lon, location.point.lat);
        draw_marker(&mut canvas, &location.marker, x, y)?;
        points.push(PlottedPoint {
            name: location.name.clone(),
            x,
            y,
        });
    }

    draw_location_labels(&mut canvas, fonts, &viewport, doc, &points)?;

    // Axes furniture
    axes::draw_frame(&mut canvas, axes_rect)?;
    match kind {
        BackendKind::Enhanced => {
            axes::draw_tick_labels(
                &mut canvas,
                fonts,
                &viewport,
                &ticks,
                TickFormat::Degrees,
                false,
            )?;
        }
        BackendKind::Basic => {
            let reach = axes::draw_tick_labels(
                &mut canvas,
                fonts,
                &viewport,
                &ticks,
                TickFormat::Plain,
                true,
            )?;
            let x_title = fonts.render_label(&doc.axis_titles.x);
            let y_title = fonts.render_label(&doc.axis_titles.y);
            axes::draw_axis_titles(
                &mut canvas,
                fonts,
                axes_rect,
                reach,
                &x_title,
                &y_title,
                doc.axis_titles.font_pt,
            );
        }
    }

    doc.legend.draw(&mut canvas, fonts, axes_rect)?;

    let title_y = axes_rect.y - canvas.pt(TITLE_PAD_PT);
    fonts.draw(
        &mut canvas,
        &title,
        axes_rect.center_x(),
        title_y,
        &title_style,
        HAlign::Center,
        VAlign::Bottom,
    );

    Ok(RenderedMap {
        canvas,
        backend: kind,
        points,
        legend_entries: doc.legend.len(),
        layers_drawn,
    })
}

fn draw_overlay(
    canvas: &mut Canvas,
    viewport: &Viewport<PlateCarree>,
    overlay: &RectOverlay,
    mask: &tiny_skia::Mask,
) -> MapResult<()> {
    let (x0, y1) = viewport.to_pixel(overlay.origin.lon, overlay.origin.lat);
    let (x1, y0) = viewport.to_pixel(
        overlay.origin.lon + overlay.width_deg,
        overlay.origin.lat + overlay.height_deg,
    );
    let Some(rect) = tiny_skia::Rect::from_ltrb(x0, y0, x1, y1) else {
        return Ok(());
    };

    let path = PathBuilder::from_rect(rect);
    let edge_width = canvas.pt(overlay.edge_width_pt);
    let mut pixmap = canvas.pixmap()?;
    pixmap.fill_path(
        &path,
        &solid_paint(overlay.face.with_alpha(overlay.alpha)),
        FillRule::Winding,
        Transform::identity(),
        Some(mask),
    );
    pixmap.stroke_path(
        &path,
        &solid_paint(overlay.edge.with_alpha(overlay.alpha)),
        &stroke(edge_width, None),
        Transform::identity(),
        Some(mask),
    );
    Ok(())
}

/// Name boxes for every location: arrows first, then boxes, then text, so
/// no box hides another label's text.
fn draw_location_labels(
    canvas: &mut Canvas,
    fonts: &FontSet,
    viewport: &Viewport<PlateCarree>,
    doc: &MapDocument,
    points: &[PlottedPoint],
) -> MapResult<()> {
    let style = TextStyle::new(doc.labels.font_pt);
    let label_box = LabelBox::new(doc.labels.box_pad, doc.labels.box_alpha);
    let arrow_style = LineStyle {
        color: Color::BLACK,
        width_pt: 1.5,
        alpha: 0.6,
        dashed: false,
    };

    let placed: Vec<(PixelRect, Option<(f32, f32)>)> = doc
        .locations
        .iter()
        .zip(points)
        .map(|(location, point)| match location.label {
            LabelPlacement::Text { dlon, dlat } => {
                let anchor = location.point.offset(dlon, dlat);
                let (x, y) = viewport.to_pixel(anchor.lon, anchor.lat);
                let rect = fonts.text_rect(
                    &location.name,
                    x,
                    y,
                    &style,
                    canvas,
                    HAlign::Left,
                    VAlign::Bottom,
                );
                (rect, None)
            }
            LabelPlacement::Annotation { dx_pt, dy_pt } => {
                let x = point.x + canvas.pt(dx_pt);
                let y = point.y - canvas.pt(dy_pt);
                let rect = fonts.text_rect(
                    &location.name,
                    x,
                    y,
                    &style,
                    canvas,
                    HAlign::Left,
                    VAlign::Bottom,
                );
                (rect, Some((point.x, point.y)))
            }
        })
        .collect();

    for (rect, target) in &placed {
        if let Some(target) = target {
            let outer = label_box.outer_rect(*rect, &style, canvas);
            let from = (outer.center_x(), outer.y + outer.height / 2.0);
            let shrink = canvas.pt(2.0);
            draw_arrow(canvas, from, *target, 0.2, &arrow_style, shrink)?;
        }
    }
    for (rect, _) in &placed {
        label_box.draw(canvas, *rect, &style)?;
    }
    for (location, (rect, _)) in doc.locations.iter().zip(&placed) {
        fonts.draw(
            canvas,
            &location.name,
            rect.x,
            rect.y,
            &style,
            HAlign::Left,
            VAlign::Top,
        );
    }
    Ok(())
}
