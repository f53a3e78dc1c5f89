//! Fritz-Kola map generator.
//!
//! Renders the supply chain overview and the Hamburg manufacturer close-up
//! as 300 DPI PNG files. Two editions share this library: `generate-map`
//! (trilingual, uses geographic feature layers when available) and
//! `generate-map-simple` (bilingual, plain grid only).

pub mod catalog;
pub mod config;
pub mod output;
pub mod runner;

pub use catalog::{Edition, MapKind};
pub use config::{GeneratorArgs, GeneratorConfig};
pub use output::{write_map, RenderResult};
pub use runner::{generate, run};
