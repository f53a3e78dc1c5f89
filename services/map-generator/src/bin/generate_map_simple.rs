//! English/German map generator on a plain grid. Failures are logged but
//! the process still exits successfully.

use clap::Parser;
use map_generator::{run, Edition, GeneratorArgs, GeneratorConfig};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = GeneratorArgs::parse();
    map_generator::config::init_tracing(&args)?;

    Ok(run(Edition::Simple, &GeneratorConfig::from(&args)))
}
