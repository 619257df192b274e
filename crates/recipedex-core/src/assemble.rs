//! Whole-registry checks and snapshot construction.
//!
//! These checks need every accepted record at once, so they run only after
//! all per-file validation has finished. Records from files that failed any
//! per-file check never get here.

use chrono::{DateTime, Utc};
use recipedex_schema::{RecipeRecord, RegistrySnapshot, ValidationError, Violation};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A record that passed every per-file check, with the file it came from.
#[derive(Debug, Clone)]
pub struct AcceptedRecipe {
    pub source: PathBuf,
    pub record: RecipeRecord,
}

/// Run the cross-reference checks over `accepted`, in the given order.
///
/// Order matters only for which of two conflicting records is blamed: the
/// first record to use a name or claim an alias keeps it.
pub fn cross_check(accepted: &[AcceptedRecipe]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut first_seen: HashMap<&str, &Path> = HashMap::with_capacity(accepted.len());
    for recipe in accepted {
        let name = recipe.record.name.as_str();
        match first_seen.entry(name) {
            Entry::Occupied(existing) => errors.push(ValidationError::new(
                ValidationError::recipe_subject(name),
                &Violation::DuplicateRecipe(existing.get().display().to_string()),
            )),
            Entry::Vacant(slot) => {
                slot.insert(recipe.source.as_path());
            }
        }
    }
    let names: HashSet<&str> = first_seen.keys().copied().collect();

    for recipe in accepted {
        for (field, dependency) in recipe.record.dependency_edges() {
            if !names.contains(dependency.as_str()) {
                errors.push(ValidationError::new(
                    ValidationError::recipe_subject(recipe.record.name.as_str()),
                    &Violation::MissingDependency {
                        field,
                        dependency: dependency.to_string(),
                    },
                ));
            }
        }
    }

    let mut claims: HashMap<&str, &str> = HashMap::new();
    for recipe in accepted {
        let claimer = recipe.record.name.as_str();
        for (ecosystem, aliases) in &recipe.record.satisfies {
            for alias in aliases {
                match claims.get(alias.as_str()) {
                    Some(&owner) if owner != claimer => errors.push(ValidationError::new(
                        ValidationError::recipe_subject(claimer),
                        &Violation::DuplicateSatisfiesClaim {
                            alias: alias.clone(),
                            owner: owner.to_owned(),
                            ecosystem: ecosystem.clone(),
                        },
                    )),
                    Some(_) => {}
                    None => {
                        claims.insert(alias.as_str(), claimer);
                    }
                }

                // Independent of the claim table: both errors may fire.
                if alias != claimer && names.contains(alias.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationError::recipe_subject(claimer),
                        &Violation::CanonicalNameCollision(alias.clone()),
                    ));
                }
            }
        }
    }

    errors
}

/// Combine per-file errors with the cross-reference pass. A snapshot comes
/// back only when the combined list is empty.
pub fn assemble(
    accepted: Vec<AcceptedRecipe>,
    mut errors: Vec<ValidationError>,
    schema_version: &str,
    generated_at: DateTime<Utc>,
) -> Result<RegistrySnapshot, Vec<ValidationError>> {
    errors.extend(cross_check(&accepted));
    if !errors.is_empty() {
        return Err(errors);
    }
    let records = accepted.into_iter().map(|a| a.record).collect();
    Ok(RegistrySnapshot::new(schema_version, generated_at, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipedex_schema::{RecipeName, SCHEMA_VERSION};
    use std::collections::BTreeMap;

    fn recipe(name: &str) -> AcceptedRecipe {
        AcceptedRecipe {
            source: PathBuf::from(format!("recipes/{}/{name}.toml", &name[..1])),
            record: RecipeRecord {
                name: RecipeName::new(name),
                description: format!("{name} description"),
                homepage: "https://example.com".to_owned(),
                dependencies: Vec::new(),
                runtime_dependencies: Vec::new(),
                satisfies: BTreeMap::new(),
            },
        }
    }

    fn with_deps(mut r: AcceptedRecipe, deps: &[&str], runtime: &[&str]) -> AcceptedRecipe {
        r.record.dependencies = deps.iter().map(|d| RecipeName::new(*d)).collect();
        r.record.runtime_dependencies = runtime.iter().map(|d| RecipeName::new(*d)).collect();
        r
    }

    fn satisfying(mut r: AcceptedRecipe, ecosystem: &str, aliases: &[&str]) -> AcceptedRecipe {
        r.record.satisfies.insert(
            ecosystem.to_owned(),
            aliases.iter().map(|a| (*a).to_owned()).collect(),
        );
        r
    }

    fn rendered(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn libcurl_claiming_curl_conflicts_with_canonical_name() {
        let errors = cross_check(&[
            recipe("curl"),
            satisfying(recipe("libcurl"), "homebrew", &["curl"]),
        ]);
        assert_eq!(errors.len(), 1, "{errors:?}");
        let msg = errors[0].to_string();
        assert!(msg.contains("curl"));
        assert!(msg.contains("conflicts with existing recipe canonical name"));
        assert_eq!(errors[0].subject, "recipe 'libcurl'");
    }

    #[test]
    fn alias_equal_to_own_name_is_allowed() {
        let errors = cross_check(&[satisfying(recipe("openssl"), "homebrew", &["openssl"])]);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn non_canonical_alias_is_allowed() {
        let errors = cross_check(&[satisfying(recipe("sqlite"), "homebrew", &["sqlite3"])]);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn duplicate_claim_reports_once() {
        let errors = cross_check(&[
            satisfying(recipe("recipe-a"), "homebrew", &["shared-name"]),
            satisfying(recipe("recipe-b"), "homebrew", &["shared-name"]),
        ]);
        assert_eq!(
            rendered(&errors),
            vec![
                "recipe 'recipe-b': duplicate satisfies entry: 'shared-name' is already claimed by recipe 'recipe-a' (in ecosystem 'homebrew')"
            ]
        );
    }

    #[test]
    fn duplicate_claim_across_ecosystems() {
        let errors = cross_check(&[
            satisfying(recipe("recipe-a"), "homebrew", &["shared"]),
            satisfying(recipe("recipe-b"), "crates-io", &["shared"]),
        ]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("(in ecosystem 'crates-io')"));
    }

    #[test]
    fn same_recipe_repeating_its_own_alias_is_not_a_duplicate() {
        let r = satisfying(recipe("openssl"), "homebrew", &["openssl@3"]);
        let r = satisfying(r, "apt", &["openssl@3"]);
        assert!(cross_check(&[r]).is_empty());
    }

    #[test]
    fn third_claimer_gets_its_own_error() {
        let errors = cross_check(&[
            satisfying(recipe("a"), "homebrew", &["x"]),
            satisfying(recipe("b"), "homebrew", &["x"]),
            satisfying(recipe("c"), "homebrew", &["x"]),
        ]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message.contains("by recipe 'a'")));
    }

    #[test]
    fn duplicate_claim_and_collision_both_fire() {
        let errors = cross_check(&[
            recipe("curl"),
            satisfying(recipe("libcurl"), "homebrew", &["curl"]),
            satisfying(recipe("curl-full"), "homebrew", &["curl"]),
        ]);
        let msgs = rendered(&errors);
        assert_eq!(msgs.len(), 3, "{msgs:?}");
        assert!(msgs[0].starts_with("recipe 'libcurl': satisfies entry 'curl' conflicts"));
        assert!(msgs[1].starts_with("recipe 'curl-full': duplicate satisfies entry"));
        assert!(msgs[2].starts_with("recipe 'curl-full': satisfies entry 'curl' conflicts"));
    }

    #[test]
    fn missing_dependency_names_field() {
        let errors = cross_check(&[
            recipe("zlib"),
            with_deps(recipe("git"), &["zlib", "openssl"], &["less"]),
        ]);
        assert_eq!(
            rendered(&errors),
            vec![
                "recipe 'git': dependencies references unknown recipe 'openssl'",
                "recipe 'git': runtime_dependencies references unknown recipe 'less'",
            ]
        );
    }

    #[test]
    fn duplicate_recipe_name_is_reported() {
        let mut second = recipe("jq");
        second.source = PathBuf::from("embedded/jq.toml");
        let errors = cross_check(&[recipe("jq"), second]);
        assert_eq!(
            rendered(&errors),
            vec!["recipe 'jq': duplicate recipe name: also defined by recipes/j/jq.toml"]
        );
    }

    #[test]
    fn assemble_is_all_or_nothing() {
        let per_file = vec![ValidationError::new(
            "recipes/b/bad.toml",
            &Violation::MissingSection,
        )];
        let result = assemble(
            vec![recipe("good")],
            per_file,
            SCHEMA_VERSION,
            Utc::now(),
        );
        assert_eq!(result.unwrap_err().len(), 1);
    }

    #[test]
    fn assemble_fails_on_cross_reference_error_alone() {
        let result = assemble(
            vec![with_deps(recipe("git"), &["zlib"], &[])],
            Vec::new(),
            SCHEMA_VERSION,
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn assemble_sorts_records() {
        let snapshot = assemble(
            vec![recipe("zstd"), recipe("bzip2"), recipe("make")],
            Vec::new(),
            SCHEMA_VERSION,
            Utc::now(),
        )
        .unwrap();
        let names: Vec<&str> = snapshot.recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bzip2", "make", "zstd"]);
        assert_eq!(snapshot.schema_version, "1.0.0");
    }
}
