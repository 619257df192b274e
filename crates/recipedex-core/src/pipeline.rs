use crate::assemble::{assemble, AcceptedRecipe};
use crate::config::IndexConfig;
use crate::decode::{metadata_section, read_manifest};
use crate::discovery::{discover, RecipeFile};
use crate::metadata::{validate_metadata, MetadataRules};
use crate::path_guard::{canonical_roots, check_containment, check_shape};
use crate::size_guard::check_size;
use crate::IndexError;
use chrono::{DateTime, Utc};
use recipedex_schema::{NamePattern, RecipeRecord, RegistrySnapshot, ValidationError, Violation};
use std::path::PathBuf;
use tracing::{debug, info};

/// Runs discovery, per-file validation, and assembly for one configuration.
///
/// The builder holds no state between runs; building twice over unchanged
/// inputs yields snapshots that differ only in `generated_at`.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    config: IndexConfig,
    names: NamePattern,
}

/// Result of a single build.
#[derive(Debug)]
pub struct BuildReport {
    pub files_checked: usize,
    pub outcome: Result<RegistrySnapshot, Vec<ValidationError>>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn errors(&self) -> &[ValidationError] {
        match &self.outcome {
            Ok(_) => &[],
            Err(errors) => errors,
        }
    }

    pub fn snapshot(&self) -> Option<&RegistrySnapshot> {
        self.outcome.as_ref().ok()
    }
}

impl RegistryBuilder {
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        config.validate()?;
        let names = NamePattern::new(&config.name_pattern)?;
        Ok(Self { config, names })
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn build(&self) -> Result<BuildReport, IndexError> {
        self.build_at(Utc::now())
    }

    /// Build with an explicit generation timestamp.
    pub fn build_at(&self, generated_at: DateTime<Utc>) -> Result<BuildReport, IndexError> {
        let files = discover(&self.config.roots, &self.config.extension)?;
        info!("found {} recipe files", files.len());

        let roots = canonical_roots(&self.config.roots);
        let mut accepted = Vec::with_capacity(files.len());
        let mut errors = Vec::new();

        for file in &files {
            match self.check_file(file, &roots) {
                Ok(record) => {
                    debug!("accepted {}", file.subject());
                    accepted.push(AcceptedRecipe {
                        source: file.path.clone(),
                        record,
                    });
                }
                Err(violations) => {
                    debug!("rejected {} ({} errors)", file.subject(), violations.len());
                    let subject = file.subject();
                    errors.extend(
                        violations
                            .iter()
                            .map(|v| ValidationError::new(subject.clone(), v)),
                    );
                }
            }
        }

        let outcome = assemble(
            accepted,
            errors,
            &self.config.schema_version,
            generated_at,
        );
        match &outcome {
            Ok(snapshot) => info!("assembled {} recipes", snapshot.recipes.len()),
            Err(errors) => info!("validation failed with {} error(s)", errors.len()),
        }

        Ok(BuildReport {
            files_checked: files.len(),
            outcome,
        })
    }

    /// Validate a single discovered file.
    ///
    /// Path and size problems are reported together and stop the file there;
    /// the manifest is never read once either guard has fired.
    pub fn check_file(
        &self,
        file: &RecipeFile,
        canonical_roots: &[PathBuf],
    ) -> Result<RecipeRecord, Vec<Violation>> {
        let guards: Vec<Violation> = [
            check_shape(file, &self.names, &self.config.extension),
            check_containment(&file.path, canonical_roots),
            check_size(&file.path, self.config.max_file_size),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !guards.is_empty() {
            return Err(guards);
        }

        let manifest = read_manifest(&file.path).map_err(|v| vec![v])?;
        let metadata = metadata_section(&manifest).map_err(|v| vec![v])?;

        let rules = MetadataRules {
            names: &self.names,
            max_description_length: self.config.max_description_length,
            dangerous_schemes: &self.config.dangerous_schemes,
        };
        validate_metadata(metadata, &file.expected_name(), &rules)
    }
}
