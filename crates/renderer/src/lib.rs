//! Static map rendering.
//!
//! Draws located markers, routes, labels, legends and titles onto a raster
//! canvas, over either real geographic feature layers (enhanced backend) or
//! a plain degree grid (basic backend), and encodes the result as PNG.

pub mod axes;
pub mod backend;
pub mod features;
pub mod figure;
pub mod legend;
pub mod map;
pub mod markers;
pub mod png;
pub mod text;

pub use backend::{probe, Backend, BackendKind};
pub use figure::Canvas;
pub use map::{render_map, MapDocument, RenderedMap};
pub use text::FontSet;
