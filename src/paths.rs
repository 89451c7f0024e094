//! Input file resolution.

use std::path::{Path, PathBuf};

/// Fallback locations probed when no input path is given on the command
/// line, in priority order.
const FALLBACK_PATHS: &[&str] = &[
    "./src/data/content.js",
    "./src/data/content.updated.js",
    "./src/data/content.final.js",
    "./data/content.js",
    "./content.js",
];

/// Resolve the content file to operate on: the explicit argument first,
/// then the fixed fallback locations. The first readable file wins.
pub fn resolve_input_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(FALLBACK_PATHS.iter().map(PathBuf::from))
        .find(|p| is_readable_file(p))
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && std::fs::File::open(path).is_ok()
}
