//! Writing rendered maps to disk.

use map_common::MapResult;
use renderer::png::encode_canvas;
use renderer::{BackendKind, RenderedMap};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// What was written for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub path: PathBuf,
    pub backend: BackendKind,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Encode `map` as PNG and write it to `output_dir/file_name`.
pub fn write_map(map: &RenderedMap, output_dir: &Path, file_name: &str) -> MapResult<RenderResult> {
    let path = output_dir.join(file_name);
    info!(file = %path.display(), "Saving map");

    let png = encode_canvas(&map.canvas)?;
    let written = std::fs::create_dir_all(output_dir).and_then(|_| std::fs::write(&path, &png));
    if let Err(e) = written {
        error!(file = %path.display(), error = %e, "Error saving map");
        return Err(e.into());
    }

    info!(
        file = %path.display(),
        backend = %map.backend,
        width = map.canvas.width(),
        height = map.canvas.height(),
        bytes = png.len(),
        "Map saved"
    );

    Ok(RenderResult {
        path,
        backend: map.backend,
        width: map.canvas.width(),
        height: map.canvas.height(),
        bytes: png.len(),
    })
}
