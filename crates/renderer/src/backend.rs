//! Rendering backend selection.
//!
//! The enhanced backend draws real geographic features underneath the map
//! content; the basic backend draws a plain degree grid. Probing never
//! fails: anything that goes wrong while looking for the enhanced backend
//! leaves the basic one in place.

use std::fmt;
use std::path::Path;

use crate::features::FeatureLayers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Enhanced,
    Basic,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Enhanced => f.write_str("enhanced"),
            BackendKind::Basic => f.write_str("basic"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Backend {
    /// Geographic feature layers are available (possibly only some of them)
    Enhanced(FeatureLayers),
    Basic,
}

impl Backend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Enhanced(_) => BackendKind::Enhanced,
            Backend::Basic => BackendKind::Basic,
        }
    }

    pub fn features(&self) -> Option<&FeatureLayers> {
        match self {
            Backend::Enhanced(layers) => Some(layers),
            Backend::Basic => None,
        }
    }
}

/// Look for the enhanced backend's feature data in `features_dir`.
pub fn probe(features_dir: Option<&Path>) -> Backend {
    let Some(dir) = features_dir else {
        tracing::info!("No feature directory configured, using basic map");
        return Backend::Basic;
    };

    if let Err(e) = std::fs::read_dir(dir) {
        tracing::warn!(
            dir = %dir.display(),
            error = %e,
            "Geographic features not available, using basic map"
        );
        return Backend::Basic;
    }

    let layers = FeatureLayers::load_dir(dir);
    tracing::info!(
        dir = %dir.display(),
        layers = ?layers.kinds(),
        "Geographic features available, using enhanced map"
    );
    Backend::Enhanced(layers)
}
