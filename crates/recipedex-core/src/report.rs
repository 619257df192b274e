//! Turns a [`BuildReport`] into diagnostics or a written `recipes.json`.

use crate::pipeline::BuildReport;
use crate::IndexError;
use recipedex_schema::{RegistrySnapshot, ValidationError};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// What happened to a build once it was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The snapshot was written to `path`.
    Written { path: PathBuf, recipes: usize },
    /// The registry is valid; nothing was written.
    Validated { recipes: usize },
    /// Validation failed; nothing was written.
    Rejected { errors: usize },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Report `report`: print errors to `diagnostics`, or write the snapshot to
/// `output` when one is given.
pub fn publish(
    report: &BuildReport,
    output: Option<&Path>,
    diagnostics: &mut impl Write,
) -> Result<Outcome, IndexError> {
    match (&report.outcome, output) {
        (Err(errors), _) => {
            write_errors(diagnostics, errors)?;
            Ok(Outcome::Rejected {
                errors: errors.len(),
            })
        }
        (Ok(snapshot), Some(path)) => {
            write_snapshot(path, snapshot)?;
            Ok(Outcome::Written {
                path: path.to_path_buf(),
                recipes: snapshot.recipes.len(),
            })
        }
        (Ok(snapshot), None) => Ok(Outcome::Validated {
            recipes: snapshot.recipes.len(),
        }),
    }
}

pub fn write_errors(out: &mut impl Write, errors: &[ValidationError]) -> io::Result<()> {
    writeln!(out, "Validation failed with {} error(s):", errors.len())?;
    for error in errors {
        writeln!(out, "  - {error}")?;
    }
    Ok(())
}

/// Write the snapshot atomically, creating the parent directory if needed.
pub fn write_snapshot(path: &Path, snapshot: &RegistrySnapshot) -> Result<(), IndexError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |source: io::Error| IndexError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(parent).map_err(write_err)?;
    let content = snapshot.to_json_pretty()?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    info!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Machine-readable summary printed with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: &'static str,
    pub files: usize,
    pub recipes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub errors: Vec<ValidationError>,
}

impl RunSummary {
    pub fn new(report: &BuildReport, outcome: &Outcome) -> Self {
        let (recipes, output) = match outcome {
            Outcome::Written { path, recipes } => (*recipes, Some(path.display().to_string())),
            Outcome::Validated { recipes } => (*recipes, None),
            Outcome::Rejected { .. } => (0, None),
        };
        Self {
            status: if outcome.is_success() { "ok" } else { "failed" },
            files: report.files_checked,
            recipes,
            output,
            errors: report.errors().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recipedex_schema::{Violation, SCHEMA_VERSION};

    fn ok_report() -> BuildReport {
        BuildReport {
            files_checked: 0,
            outcome: Ok(RegistrySnapshot::new(SCHEMA_VERSION, Utc::now(), Vec::new())),
        }
    }

    fn failed_report() -> BuildReport {
        BuildReport {
            files_checked: 2,
            outcome: Err(vec![
                ValidationError::new("recipes/a/a.toml", &Violation::MissingSection),
                ValidationError::new(
                    "recipe 'b'",
                    &Violation::MissingDependency {
                        field: "dependencies",
                        dependency: "zlib".to_owned(),
                    },
                ),
            ]),
        }
    }

    #[test]
    fn errors_are_listed_one_per_line() {
        let mut buf = Vec::new();
        write_errors(&mut buf, failed_report().errors()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Validation failed with 2 error(s):\n\
             \x20 - recipes/a/a.toml: missing [metadata] section\n\
             \x20 - recipe 'b': dependencies references unknown recipe 'zlib'\n"
        );
    }

    #[test]
    fn rejected_build_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("_site/recipes.json");
        let mut diag = Vec::new();
        let outcome = publish(&failed_report(), Some(&output), &mut diag).unwrap();
        assert_eq!(outcome, Outcome::Rejected { errors: 2 });
        assert!(!output.exists());
        assert!(!dir.path().join("_site").exists());
        assert!(!diag.is_empty());
    }

    #[test]
    fn successful_build_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("_site/nested/recipes.json");
        let mut diag = Vec::new();
        let outcome = publish(&ok_report(), Some(&output), &mut diag).unwrap();
        assert_eq!(
            outcome,
            Outcome::Written {
                path: output.clone(),
                recipes: 0
            }
        );
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(diag.is_empty());
    }

    #[test]
    fn validate_only_writes_nothing() {
        let mut diag = Vec::new();
        let outcome = publish(&ok_report(), None, &mut diag).unwrap();
        assert_eq!(outcome, Outcome::Validated { recipes: 0 });
    }

    #[test]
    fn write_snapshot_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("recipes.json");
        fs::write(&output, "stale").unwrap();
        let snapshot = RegistrySnapshot::new(SCHEMA_VERSION, Utc::now(), Vec::new());
        write_snapshot(&output, &snapshot).unwrap();
        let back: RegistrySnapshot =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn summary_json_shape() {
        let report = failed_report();
        let summary = RunSummary::new(&report, &Outcome::Rejected { errors: 2 });
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["files"], 2);
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert!(json.get("output").is_none());
    }
}
