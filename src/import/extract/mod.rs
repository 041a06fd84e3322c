//! Metadata extractors
//!
//! One extractor per metadata section. Each walks the whole element tree,
//! reads fields through [`fallback::FieldChain`]s and never fails: a missing
//! section simply yields an empty list.

pub mod connections;
pub mod dashboards;
pub mod datasources;
pub mod fallback;
pub mod measures;
pub mod relationships;
pub mod tables;
pub mod title;
pub mod worksheets;

use serde::{Deserialize, Serialize};

pub use connections::extract_connections;
pub use dashboards::extract_dashboards;
pub use datasources::extract_datasources;
pub use measures::extract_measures;
pub use relationships::extract_relationships;
pub use tables::extract_tables;
pub use title::extract_title;
pub use worksheets::extract_worksheets;

/// Visuals kept per worksheet when nothing else is configured.
pub const DEFAULT_VISUAL_LIMIT: usize = 10;

/// Tunables shared by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Maximum number of visual candidates kept per worksheet
    pub visual_limit: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            visual_limit: DEFAULT_VISUAL_LIMIT,
        }
    }
}

impl ExtractOptions {
    pub fn with_visual_limit(mut self, limit: usize) -> Self {
        self.visual_limit = limit;
        self
    }
}
