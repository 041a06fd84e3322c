//! Worksheets re-labelled as pages of a [`VisualSpec`]

use crate::models::{Page, ParsedMetadata, VisualSpec};
use chrono::{DateTime, Utc};

/// Build the visual spec for `report_id` from the extracted worksheets.
pub fn build_visual_spec(
    meta: &ParsedMetadata,
    report_id: &str,
    generated_at: DateTime<Utc>,
) -> VisualSpec {
    VisualSpec {
        report_id: report_id.to_string(),
        generated_at: Some(generated_at),
        pages: meta
            .worksheets
            .iter()
            .map(|ws| Page {
                name: ws.name.clone(),
                visuals: ws.visuals.clone(),
            })
            .collect(),
    }
}
