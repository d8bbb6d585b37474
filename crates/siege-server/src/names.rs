//! Display names for synthetic lobby participants.

use std::path::Path;

use tracing::{info, warn};

/// Load one name per line, skipping blank lines and `#` comments.
///
/// A missing or unreadable file is not fatal: the lobby simply gets no
/// synthetic fillers.
pub fn load_names(path: &Path) -> Vec<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("could not read names file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let names: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    info!("loaded {} synthetic names from {}", names.len(), path.display());
    names
}
