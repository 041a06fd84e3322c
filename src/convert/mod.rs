//! Conversion of extracted metadata into target-neutral specifications
//!
//! - [`ModelSpecBuilder`]: ParsedMetadata → ModelSpec (sanitized, typed)
//! - [`build_visual_spec`]: worksheets → VisualSpec pages

pub mod model_spec;
pub mod visual_spec;

pub use model_spec::ModelSpecBuilder;
pub use visual_spec::build_visual_spec;
