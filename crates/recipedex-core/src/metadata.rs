//! Field-level validation of a manifest's `[metadata]` table.
//!
//! Every applicable check runs and every failure is collected; a field that
//! is missing (or not a string) simply skips its own later checks. A record
//! is produced only when nothing was collected.

use recipedex_schema::{NamePattern, RecipeName, RecipeRecord, Violation};
use std::collections::BTreeMap;

const REQUIRED_FIELDS: [&str; 3] = ["name", "description", "homepage"];
const SECURE_SCHEME: &str = "https://";
const HOMEPAGE_PREVIEW_CHARS: usize = 50;

/// Thresholds and patterns the metadata checks are measured against.
#[derive(Debug, Clone, Copy)]
pub struct MetadataRules<'a> {
    pub names: &'a NamePattern,
    pub max_description_length: usize,
    pub dangerous_schemes: &'a [String],
}

pub fn validate_metadata(
    metadata: &toml::Table,
    expected_name: &str,
    rules: &MetadataRules<'_>,
) -> Result<RecipeRecord, Vec<Violation>> {
    let mut violations = Vec::new();

    let [name, description, homepage] =
        REQUIRED_FIELDS.map(|field| required_str(metadata, field, &mut violations));

    if let Some(name) = name {
        check_name(name, expected_name, rules.names, &mut violations);
    }
    if let Some(description) = description {
        check_description(description, rules.max_description_length, &mut violations);
    }
    if let Some(homepage) = homepage {
        check_homepage(homepage, rules.dangerous_schemes, &mut violations);
    }

    let dependencies = name_list(metadata, "dependencies", rules.names, &mut violations);
    let runtime_dependencies =
        name_list(metadata, "runtime_dependencies", rules.names, &mut violations);
    let satisfies = satisfies_map(metadata, &mut violations);

    match (name, description, homepage) {
        (Some(name), Some(description), Some(homepage)) if violations.is_empty() => {
            Ok(RecipeRecord {
                name: RecipeName::new(name),
                description: description.to_owned(),
                homepage: homepage.to_owned(),
                dependencies,
                runtime_dependencies,
                satisfies,
            })
        }
        _ => Err(violations),
    }
}

fn required_str<'t>(
    metadata: &'t toml::Table,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<&'t str> {
    match metadata.get(field) {
        None => {
            violations.push(Violation::MissingField(field));
            None
        }
        Some(toml::Value::String(s)) => Some(s),
        Some(other) => {
            violations.push(Violation::FieldType {
                field,
                found: other.type_str(),
            });
            None
        }
    }
}

fn check_name(name: &str, expected: &str, names: &NamePattern, violations: &mut Vec<Violation>) {
    if name != expected {
        violations.push(Violation::NameMismatch {
            name: name.to_owned(),
            expected: expected.to_owned(),
        });
    }
    if !names.is_match(name) {
        violations.push(Violation::NameCharset {
            name: name.to_owned(),
            rule: names.describe(),
        });
    }
}

fn check_description(description: &str, limit: usize, violations: &mut Vec<Violation>) {
    let length = description.chars().count();
    if length > limit {
        violations.push(Violation::DescriptionTooLong { length, limit });
    }
    if description.chars().any(|c| u32::from(c) < 0x20) {
        violations.push(Violation::DescriptionControlChars);
    }
}

fn check_homepage(homepage: &str, dangerous_schemes: &[String], violations: &mut Vec<Violation>) {
    if !homepage.starts_with(SECURE_SCHEME) {
        violations.push(Violation::HomepageScheme(
            homepage.chars().take(HOMEPAGE_PREVIEW_CHARS).collect(),
        ));
    }
    let lowered = homepage.to_lowercase();
    for scheme in dangerous_schemes {
        if lowered.contains(&scheme.to_lowercase()) {
            violations.push(Violation::DangerousScheme(scheme.clone()));
        }
    }
}

fn name_list(
    metadata: &toml::Table,
    field: &'static str,
    names: &NamePattern,
    violations: &mut Vec<Violation>,
) -> Vec<RecipeName> {
    let Some(value) = metadata.get(field) else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        violations.push(Violation::DependencyNotList {
            field,
            found: value.type_str(),
        });
        return Vec::new();
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(entry) if names.is_match(entry) => out.push(RecipeName::new(entry)),
            Some(entry) => violations.push(Violation::DependencyCharset {
                field,
                index,
                entry: entry.to_owned(),
                rule: names.describe(),
            }),
            None => violations.push(Violation::DependencyNotString {
                field,
                index,
                found: item.type_str(),
            }),
        }
    }
    out
}

fn satisfies_map(
    metadata: &toml::Table,
    violations: &mut Vec<Violation>,
) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    let Some(value) = metadata.get("satisfies") else {
        return out;
    };
    let Some(table) = value.as_table() else {
        violations.push(Violation::SatisfiesNotTable(value.type_str()));
        return out;
    };

    for (ecosystem, entries) in table {
        let Some(items) = entries.as_array() else {
            violations.push(Violation::SatisfiesNotList {
                ecosystem: ecosystem.clone(),
                found: entries.type_str(),
            });
            continue;
        };
        let mut aliases = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(alias) if alias.trim().is_empty() => {
                    violations.push(Violation::SatisfiesEmpty {
                        ecosystem: ecosystem.clone(),
                        index,
                    });
                }
                Some(alias) => aliases.push(alias.to_owned()),
                None => violations.push(Violation::SatisfiesNotString {
                    ecosystem: ecosystem.clone(),
                    index,
                    found: item.type_str(),
                }),
            }
        }
        out.insert(ecosystem.clone(), aliases);
    }
    out
}
