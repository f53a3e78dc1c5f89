//! Command-line and environment configuration.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::catalog::MapKind;

/// Options shared by both generator binaries. Every flag can also be set
/// through the environment or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(about = "Render the Fritz-Kola supply chain and manufacturer location maps")]
pub struct GeneratorArgs {
    /// Directory the PNG files are written to
    #[arg(long, env = "MAPGEN_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory with ocean/land/coastline/borders GeoJSON layers
    #[arg(long, env = "MAPGEN_FEATURES_DIR")]
    pub features_dir: Option<PathBuf>,

    /// TrueType font for all text (use a CJK-capable font for Chinese labels)
    #[arg(long, env = "MAPGEN_FONT")]
    pub font: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(
        long,
        env = "MAPGEN_DPI",
        default_value_t = 300,
        value_parser = clap::value_parser!(u32).range(1..=1200)
    )]
    pub dpi: u32,

    /// Skip the feature probe and draw the plain grid
    #[arg(long, env = "MAPGEN_FORCE_BASIC")]
    pub basic: bool,

    /// Render just one of the maps
    #[arg(long, value_enum)]
    pub only: Option<MapKind>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "MAPGEN_LOG_JSON")]
    pub log_json: bool,
}

/// Resolved settings for one generator run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub features_dir: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub dpi: u32,
    pub force_basic: bool,
    pub maps: Vec<MapKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            features_dir: None,
            font: None,
            dpi: 300,
            force_basic: false,
            maps: MapKind::ALL.to_vec(),
        }
    }
}

impl From<&GeneratorArgs> for GeneratorConfig {
    fn from(args: &GeneratorArgs) -> Self {
        Self {
            output_dir: args.output_dir.clone(),
            features_dir: args.features_dir.clone(),
            font: args.font.clone(),
            dpi: args.dpi,
            force_basic: args.basic,
            maps: match args.only {
                Some(kind) => vec![kind],
                None => MapKind::ALL.to_vec(),
            },
        }
    }
}

pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `--log-level`.
pub fn init_tracing(args: &GeneratorArgs) -> Result<()> {
    let level = parse_level(&args.log_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let builder = FmtSubscriber::builder().with_env_filter(filter).with_target(false);

    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_zero_argument_run() {
        let args = GeneratorArgs::try_parse_from(["generate-map"]).unwrap();
        let config = GeneratorConfig::from(&args);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.maps, MapKind::ALL.to_vec());
        assert!(!config.force_basic);
        assert!(config.features_dir.is_none());
    }

    #[test]
    fn test_only_selects_one_map() {
        let argv = ["generate-map", "--only", "manufacturer", "--dpi", "72"];
        let args = GeneratorArgs::try_parse_from(argv).unwrap();
        let config = GeneratorConfig::from(&args);
        assert_eq!(config.maps, vec![MapKind::Manufacturer]);
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn test_rejects_zero_dpi() {
        let result = GeneratorArgs::try_parse_from(["generate-map", "--dpi", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("nonsense"), Level::INFO);
    }
}
