//! Input file discovery
//!
//! Finds the export files sitting directly inside the input directory.
//! Subdirectories are not searched.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Discover input files with the given extension, sorted by file name
pub fn discover_input_files(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(Error::InputDirectoryNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    debug!("Searching for .{} files in: {}", extension, input_dir.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", input_dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} input files", files.len());
    Ok(files)
}

/// Check a path's extension, ignoring ASCII case
fn has_extension(path: &Path, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
