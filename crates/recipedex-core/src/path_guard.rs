//! Path shape and containment checks for discovered manifests.
//!
//! Both checks run on every file and report independently: a path can be
//! badly shaped, escape its root through a symlink, or both.

use crate::config::{RecipeRoot, RootLayout};
use crate::discovery::RecipeFile;
use recipedex_schema::{NamePattern, Violation};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Canonical forms of the roots that exist on disk.
pub fn canonical_roots(roots: &[RecipeRoot]) -> Vec<PathBuf> {
    roots
        .iter()
        .filter_map(|root| match fs::canonicalize(&root.path) {
            Ok(p) => Some(p),
            Err(e) => {
                debug!("cannot canonicalize root {}: {e}", root.path.display());
                None
            }
        })
        .collect()
}

/// Check that `file` sits where its root's layout says manifests live.
pub fn check_shape(file: &RecipeFile, names: &NamePattern, extension: &str) -> Option<Violation> {
    let matches = file
        .path
        .strip_prefix(&file.root.path)
        .is_ok_and(|rel| shape_matches(rel, file.root.layout, names, extension));
    if matches {
        None
    } else {
        Some(Violation::PathShape {
            expected: shape_hint(&file.root, names, extension),
        })
    }
}

/// Check that `path` still resolves inside one of `canonical_roots` once
/// symlinks and relative segments are followed.
pub fn check_containment(path: &Path, canonical_roots: &[PathBuf]) -> Option<Violation> {
    match fs::canonicalize(path) {
        Ok(resolved) => {
            if canonical_roots.iter().any(|root| resolved.starts_with(root)) {
                None
            } else {
                debug!("{} resolves outside every root: {}", path.display(), resolved.display());
                Some(Violation::PathTraversal)
            }
        }
        Err(e) => Some(Violation::PathUnresolvable(e.to_string())),
    }
}

fn shape_matches(rel: &Path, layout: RootLayout, names: &NamePattern, extension: &str) -> bool {
    let Some(parts) = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()
    else {
        return false;
    };

    let file_name = match (layout, parts.as_slice()) {
        (RootLayout::Sharded, [shard, file_name]) if is_shard(shard) => *file_name,
        (RootLayout::Flat, [file_name]) => *file_name,
        _ => return false,
    };

    file_name
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
        .is_some_and(|stem| names.is_match(stem))
}

fn is_shard(dir: &str) -> bool {
    let mut chars = dir.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase())
}

fn shape_hint(root: &RecipeRoot, names: &NamePattern, extension: &str) -> String {
    let name = names.as_str().trim_start_matches('^').trim_end_matches('$');
    match root.layout {
        RootLayout::Sharded => format!("{}/[a-z]/{name}.{extension}", root.path.display()),
        RootLayout::Flat => format!("{}/{name}.{extension}", root.path.display()),
    }
}
