//! Validation functionality
//!
//! Provides validation logic for:
//! - Identifier sanitization (names embedded in generated code)
//! - Relationship materialization (endpoints must resolve against the model spec)

pub mod input;
pub mod relationships;

pub use input::{
    EMPTY_IDENTIFIER, is_safe_identifier, sanitize_identifier, sanitize_optional, single_line,
};
pub use relationships::{
    RelationshipCheck, RelationshipValidationResult, RelationshipValidator, ResolvedRelationship,
    SkipReason,
};
