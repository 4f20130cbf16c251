pub mod output;

use crate::parser::is_cpp_file;
use ignore::WalkBuilder;
use log::warn;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Expand the command line paths into the C++ files they name or contain.
/// Directory walks honour `.gitignore` and skip hidden entries.
pub fn collect_files(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
    let mut files = BTreeSet::new();

    for path in paths {
        if path.is_file() {
            files.insert(path.clone());
            continue;
        }
        if !path.exists() {
            warn!("Path not found: {}", path.display());
            continue;
        }

        for entry in WalkBuilder::new(path).build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().map_or(false, |t| t.is_file());
                    if is_file && is_cpp_file(entry.path()) {
                        files.insert(entry.into_path());
                    }
                }
                Err(e) => warn!("Skipping entry: {}", e),
            }
        }
    }

    files
}
