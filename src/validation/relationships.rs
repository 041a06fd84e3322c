//! Relationship validation functionality
//!
//! Decides which extracted relationships can be materialized against a
//! ModelSpec. Invalid relationships are never an error: they are reported
//! with a reason and skipped.
//!
//! Relationships carry the raw extracted names while ModelSpec tables and
//! columns are sanitized, so endpoints are sanitized before they are matched.

use super::input::sanitize_identifier;
use crate::models::{ModelSpec, RelationshipMeta};
use serde::{Deserialize, Serialize};

/// Why a relationship cannot be materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// One or more of the four endpoint fields is missing
    MissingElements,
    /// An endpoint table is not declared in the ModelSpec
    TableNotFound { table: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingElements => write!(f, "missing elements"),
            SkipReason::TableNotFound { table } => write!(f, "table not found: {}", table),
        }
    }
}

/// A relationship whose four endpoints all resolve against the ModelSpec.
///
/// Every name is sanitized, matching the ModelSpec's table and column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// Outcome of checking one relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipCheck {
    Valid(ResolvedRelationship),
    Skipped(SkipReason),
}

/// Summary over all relationships of a ModelSpec.
#[derive(Debug, Default, Serialize, Deserialize)]
#[must_use = "validation results should be checked for skipped relationships"]
pub struct RelationshipValidationResult {
    /// Indexes into `ModelSpec::relationships` that can be materialized
    pub valid: Vec<usize>,
    /// Indexes and reasons of relationships that will be skipped
    pub skipped: Vec<(usize, SkipReason)>,
}

/// Relationship validator
#[derive(Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    /// Create a new relationship validator
    ///
    /// # Example
    ///
    /// ```rust
    /// use bi_migration_sdk::validation::relationships::RelationshipValidator;
    ///
    /// let validator = RelationshipValidator::new();
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Check a single relationship against the tables declared in `spec`.
    ///
    /// Missing endpoints are reported before unknown tables; the from-table
    /// is checked before the to-table. Table names on both sides are compared
    /// after sanitization.
    pub fn check(&self, rel: &RelationshipMeta, spec: &ModelSpec) -> RelationshipCheck {
        let endpoints = (
            non_empty(&rel.from_table),
            non_empty(&rel.from_column),
            non_empty(&rel.to_table),
            non_empty(&rel.to_column),
        );
        let (Some(from_table), Some(from_column), Some(to_table), Some(to_column)) = endpoints
        else {
            return RelationshipCheck::Skipped(SkipReason::MissingElements);
        };

        for table in [from_table, to_table] {
            let wanted = sanitize_identifier(table);
            if !spec.tables.iter().any(|t| sanitize_identifier(&t.name) == wanted) {
                return RelationshipCheck::Skipped(SkipReason::TableNotFound {
                    table: table.to_string(),
                });
            }
        }

        RelationshipCheck::Valid(ResolvedRelationship {
            from_table: sanitize_identifier(from_table),
            from_column: sanitize_identifier(from_column),
            to_table: sanitize_identifier(to_table),
            to_column: sanitize_identifier(to_column),
        })
    }

    /// Check every relationship in `spec`.
    pub fn validate(&self, spec: &ModelSpec) -> RelationshipValidationResult {
        let mut result = RelationshipValidationResult::default();
        for (idx, rel) in spec.relationships.iter().enumerate() {
            match self.check(rel, spec) {
                RelationshipCheck::Valid(_) => result.valid.push(idx),
                RelationshipCheck::Skipped(reason) => result.skipped.push((idx, reason)),
            }
        }
        result
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
