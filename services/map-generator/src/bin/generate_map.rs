//! Trilingual map generator. Uses geographic feature layers for the supply
//! chain map when they can be loaded and exits non-zero on failure.

use clap::Parser;
use map_generator::{run, Edition, GeneratorArgs, GeneratorConfig};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = GeneratorArgs::parse();
    map_generator::config::init_tracing(&args)?;

    Ok(run(Edition::Full, &GeneratorConfig::from(&args)))
}
