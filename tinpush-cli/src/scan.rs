//! Recursive scan for package files under the root directory.

use std::path::Path;

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

/// List package files under `root`, sorted so the announced manifest
/// order is deterministic. Paths that are not valid UTF-8 cannot be put
/// on the wire and are skipped. An empty result is an error.
pub fn package_files(root: &Path, extension: &str) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.with_context(|| format!("scanning {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(p) = path.to_str() {
            files.push(p.to_string());
        }
    }
    files.sort();
    if files.is_empty() {
        bail!("no .{} files found under {}", extension, root.display());
    }
    Ok(files)
}
