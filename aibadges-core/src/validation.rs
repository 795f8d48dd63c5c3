//! Catalog Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Any error-severity violation rejects the catalog before rendering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::Catalog;

/// Labels longer than this overflow any reasonable badge row.
pub const MAX_LABEL_CHARS: usize = 48;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub label: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub catalog_version: String,
    pub badge_count: usize,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error)
    }

    /// Error messages joined for a single-line report.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, catalog: &Catalog) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct EmptyLabelRule;

impl ValidationRule for EmptyLabelRule {
    fn name(&self) -> &'static str {
        "empty_label"
    }

    fn validate(&self, catalog: &Catalog) -> Vec<ValidationViolation> {
        catalog
            .iter()
            .enumerate()
            .filter(|(_, badge)| badge.label.trim().is_empty())
            .map(|(index, badge)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Badge #{} has an empty label", index + 1),
                label: Some(badge.label.clone()),
                expected: Some("non-empty label".to_string()),
                actual: Some(format!("{:?}", badge.label)),
                remediation: vec!["Give every catalog entry a visible label".to_string()],
            })
            .collect()
    }
}

pub struct SlugCharsetRule;

impl ValidationRule for SlugCharsetRule {
    fn name(&self) -> &'static str {
        "slug_charset"
    }

    fn validate(&self, catalog: &Catalog) -> Vec<ValidationViolation> {
        let mut violations = vec![];

        for badge in catalog.iter() {
            // empty labels are reported by EmptyLabelRule
            if badge.label.trim().is_empty() {
                continue;
            }
            let slug = badge.slug();
            if slug.is_empty() || !slug.is_well_formed() {
                violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!("Label '{}' does not produce a usable slug", badge.label),
                    label: Some(badge.label.clone()),
                    expected: Some("[a-z0-9-]+".to_string()),
                    actual: Some(slug.to_string()),
                    remediation: vec!["Include at least one ASCII letter or digit".to_string()],
                });
            }
        }

        violations
    }
}

pub struct SlugCollisionRule;

impl ValidationRule for SlugCollisionRule {
    fn name(&self) -> &'static str {
        "slug_collision"
    }

    fn validate(&self, catalog: &Catalog) -> Vec<ValidationViolation> {
        let mut first_seen: HashMap<String, &str> = HashMap::new();
        let mut violations = vec![];

        for badge in catalog.iter() {
            let slug = badge.slug();
            if slug.is_empty() {
                continue;
            }
            match first_seen.get(slug.as_str()) {
                Some(previous) => violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!(
                        "Labels '{}' and '{}' share slug '{}'",
                        previous, badge.label, slug
                    ),
                    label: Some(badge.label.clone()),
                    expected: Some("unique slug per label".to_string()),
                    actual: Some(slug.to_string()),
                    remediation: vec![
                        "Rename one label so the slugs differ".to_string(),
                        "Remove the duplicate catalog entry".to_string(),
                    ],
                }),
                None => {
                    first_seen.insert(slug.to_string(), &badge.label);
                }
            }
        }

        violations
    }
}

pub struct LabelLengthRule;

impl ValidationRule for LabelLengthRule {
    fn name(&self) -> &'static str {
        "label_length"
    }

    fn validate(&self, catalog: &Catalog) -> Vec<ValidationViolation> {
        catalog
            .iter()
            .filter(|badge| badge.label.chars().count() > MAX_LABEL_CHARS)
            .map(|badge| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("Label '{}' makes a very wide badge", badge.label),
                label: Some(badge.label.clone()),
                expected: Some(format!("{} characters max", MAX_LABEL_CHARS)),
                actual: Some(format!("{} characters", badge.label.chars().count())),
                remediation: vec!["Shorten the label".to_string()],
            })
            .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(EmptyLabelRule),
                Box::new(SlugCharsetRule),
                Box::new(SlugCollisionRule),
                Box::new(LabelLengthRule),
            ],
        }
    }

    pub fn validate(&self, catalog: &Catalog) -> ValidationResult {
        let mut violations = vec![];
        for rule in &self.rules {
            violations.extend(rule.validate(catalog));
        }

        let valid = !violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error);

        ValidationResult {
            valid,
            violations,
            catalog_version: catalog.catalog_version.clone(),
            badge_count: catalog.len(),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
