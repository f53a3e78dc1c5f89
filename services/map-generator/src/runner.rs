//! One generator run: probe, render each selected map, write it out.

use anyhow::{Context, Result};
use renderer::map::BackendPreference;
use renderer::{probe, render_map, Backend, FontSet};
use std::process::ExitCode;
use tracing::{error, info};

use crate::catalog::Edition;
use crate::config::GeneratorConfig;
use crate::output::{write_map, RenderResult};

const RULE: &str = "============================================================";

fn load_fonts(config: &GeneratorConfig) -> Result<FontSet> {
    match &config.font {
        Some(path) => {
            FontSet::from_file(path).with_context(|| format!("loading font {}", path.display()))
        }
        None => FontSet::embedded().context("loading embedded fonts"),
    }
}

/// Render and write every map selected in `config`.
pub fn generate(edition: Edition, config: &GeneratorConfig) -> Result<Vec<RenderResult>> {
    let fonts = load_fonts(config)?;
    let documents: Vec<_> = config
        .maps
        .iter()
        .map(|kind| (*kind, kind.document(edition)))
        .collect();

    // Only look for feature layers when some map can use them
    let wants_features = documents
        .iter()
        .any(|(_, doc)| doc.backend == BackendPreference::PreferEnhanced);
    let backend = if config.force_basic {
        info!("Basic map forced by configuration");
        Backend::Basic
    } else if wants_features {
        probe(config.features_dir.as_deref())
    } else {
        Backend::Basic
    };

    let total = documents.len();
    let mut results = Vec::with_capacity(total);
    for (i, (kind, doc)) in documents.iter().enumerate() {
        info!("[{}/{}] Generating {}...", i + 1, total, kind.description());

        let rendered = render_map(doc, &backend, &fonts, config.dpi)
            .with_context(|| format!("rendering {}", kind.description()))?;
        let result = write_map(&rendered, &config.output_dir, &doc.output_file)
            .with_context(|| format!("saving {}", doc.output_file))?;
        results.push(result);
    }
    Ok(results)
}

/// Run a whole edition and map the outcome to a process exit code.
pub fn run(edition: Edition, config: &GeneratorConfig) -> ExitCode {
    info!("{}", RULE);
    info!("{}", edition.banner());
    info!("{}", RULE);

    match generate(edition, config) {
        Ok(results) => {
            info!("SUCCESS! Maps generated successfully.");
            info!("Generated files:");
            for result in &results {
                info!(backend = %result.backend, "  - {}", result.path.display());
            }
            ExitCode::from(exit_status(edition, true))
        }
        Err(e) => {
            error!("ERROR: Map generation failed!");
            error!("Error details: {:#}", e);
            ExitCode::from(exit_status(edition, false))
        }
    }
}

/// Process status for a run that did or did not succeed. The simple edition
/// reports failures in the log only.
pub fn exit_status(edition: Edition, succeeded: bool) -> u8 {
    if succeeded || !edition.fails_loudly() {
        0
    } else {
        1
    }
}
