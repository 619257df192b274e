//! Enumerates candidate manifest files under the configured roots.

use crate::config::{RecipeRoot, RootLayout};
use crate::IndexError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A manifest found on disk, together with the root that claimed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFile {
    pub path: PathBuf,
    pub root: RecipeRoot,
}

impl RecipeFile {
    /// The recipe name this file must declare: its file name minus the extension.
    pub fn expected_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path as it appears in diagnostics.
    pub fn subject(&self) -> String {
        self.path.display().to_string()
    }
}

/// List every manifest under `roots`, sorted by path.
///
/// Roots that do not exist are skipped. A file reachable through two
/// spellings of the same root is kept once, under the first root listed.
pub fn discover(roots: &[RecipeRoot], extension: &str) -> Result<Vec<RecipeFile>, IndexError> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for root in roots {
        if !root.path.is_dir() {
            debug!("skipping missing recipe root {}", root.path.display());
            continue;
        }
        debug!("scanning {} root {}", root.layout, root.path.display());

        let mut found = Vec::new();
        match root.layout {
            RootLayout::Sharded => {
                for entry in dir_entries(&root.path)? {
                    if entry.is_dir() {
                        collect_manifests(&entry, root, extension, &mut found)?;
                    } else if has_extension(&entry, extension) {
                        warn!(
                            "ignoring {}: manifests in a sharded root belong in a letter directory",
                            entry.display()
                        );
                    }
                }
            }
            RootLayout::Flat => collect_manifests(&root.path, root, extension, &mut found)?,
        }

        let canonical_root = fs::canonicalize(&root.path).unwrap_or_else(|_| root.path.clone());
        for file in found {
            let key = file
                .path
                .strip_prefix(&root.path)
                .map_or_else(|_| file.path.clone(), |rel| canonical_root.join(rel));
            if seen.insert(key) {
                files.push(file);
            } else {
                debug!("{} already found under an earlier root", file.path.display());
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("discovered {} manifest files", files.len());
    Ok(files)
}

fn collect_manifests(
    dir: &Path,
    root: &RecipeRoot,
    extension: &str,
    out: &mut Vec<RecipeFile>,
) -> Result<(), IndexError> {
    for path in dir_entries(dir)? {
        if path.is_file() && has_extension(&path, extension) {
            out.push(RecipeFile {
                path,
                root: root.clone(),
            });
        }
    }
    Ok(())
}

fn dir_entries(dir: &Path) -> Result<Vec<PathBuf>, IndexError> {
    let read_err = |source: std::io::Error| IndexError::Root {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        entries.push(entry.map_err(read_err)?.path());
    }
    Ok(entries)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|e| e == extension)
}
