//! Report layout exporter
//!
//! Projects a [`VisualSpec`] onto the target report designer's layout
//! document: one section per page, one visual container per visual that
//! references at least one field.

use super::ExportError;
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::models::{
    LayoutSection, PrototypeQuery, QuerySource, ReportLayout, Visual, VisualContainer, VisualSpec,
};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub const LAYOUT_VERSION: &str = "1.13.0";

/// Source visual type → target visual type.
const VISUAL_TYPES: &[(&str, &str)] = &[("Table", "tableEx"), ("PieChart", "pieChart")];
const DEFAULT_VISUAL_TYPE: &str = "tableEx";

/// Alias of the single query source every visual selects from.
const SOURCE_ALIAS: &str = "a";

/// Supplies section and visual container names.
///
/// `key` identifies the object's position in the layout.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, key: &str) -> String;
}

/// Random UUID v4 names.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self, _key: &str) -> String {
        Uuid::new_v4().to_string()
    }
}

/// UUID v5 names derived from the object's position, so the same spec
/// always yields the same layout.
#[derive(Debug, Default)]
pub struct StableIds;

impl IdGenerator for StableIds {
    fn next_id(&self, key: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
    }
}

/// Counter-based names (`00000000-0000-0000-0000-000000000001`, ...).
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, _key: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(n)).to_string()
    }
}

/// Layout exporter
pub struct LayoutExporter {
    ids: Box<dyn IdGenerator>,
}

impl Default for LayoutExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutExporter {
    /// Create a layout exporter with position-derived ([`StableIds`]) names.
    pub fn new() -> Self {
        Self {
            ids: Box::new(StableIds),
        }
    }

    pub fn with_ids(ids: impl IdGenerator + 'static) -> Self {
        Self { ids: Box::new(ids) }
    }

    /// Target visual type for a source visual type.
    pub fn map_visual_type(source: &str) -> &'static str {
        VISUAL_TYPES
            .iter()
            .find(|(from, _)| *from == source)
            .map(|(_, to)| *to)
            .unwrap_or(DEFAULT_VISUAL_TYPE)
    }

    /// Project `spec` onto a layout bound to `dataset`.
    ///
    /// Every page becomes a section; visuals without fields are dropped.
    pub fn export(&self, spec: &VisualSpec, dataset: &str) -> ReportLayout {
        let sections = spec
            .pages
            .iter()
            .enumerate()
            .map(|(page_idx, page)| {
                let page_key = format!("{}/{}/{}", dataset, page_idx, page.name);
                LayoutSection {
                    name: self.ids.next_id(&page_key),
                    display_name: page.name.clone(),
                    visual_containers: page
                        .visuals
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| !v.fields.is_empty())
                        .map(|(visual_idx, v)| {
                            let key = format!("{}/{}", page_key, visual_idx);
                            self.container(v, dataset, self.ids.next_id(&key))
                        })
                        .collect(),
                }
            })
            .collect();

        ReportLayout {
            version: LAYOUT_VERSION.to_string(),
            config: json!({ "layoutOptimization": 1 }),
            sections,
        }
    }

    fn container(&self, visual: &Visual, dataset: &str, name: String) -> VisualContainer {
        // dotted names are qualified references the single-entity query cannot bind
        let select: Vec<Value> = visual
            .fields
            .iter()
            .filter(|f| !f.contains('.'))
            .map(|f| {
                json!({
                    "Column": {
                        "Expression": { "SourceRef": { "Entity": dataset } },
                        "Property": f
                    }
                })
            })
            .collect();

        VisualContainer {
            name,
            visual_type: Self::map_visual_type(&visual.visual_type).to_string(),
            title: visual.title.clone().unwrap_or_default(),
            prototype_query: PrototypeQuery {
                from: vec![QuerySource {
                    name: SOURCE_ALIAS.to_string(),
                    entity: dataset.to_string(),
                }],
                select,
            },
        }
    }

    /// Read a visual spec document from disk.
    pub fn load_visual_spec(path: &Path) -> Result<VisualSpec, ExportError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ExportError::IoError(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Project and write the layout document to `out_path`.
    pub fn write(
        &self,
        spec: &VisualSpec,
        dataset: &str,
        out_path: &Path,
        events: &dyn EventSink,
    ) -> Result<ReportLayout, ExportError> {
        let layout = self.export(spec, dataset);
        if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(out_path, serde_json::to_string_pretty(&layout)?)?;
        events.record(ConversionEvent::info(
            Stage::Layout,
            EventKind::ArtifactWritten,
            format!("Generated report layout JSON: {}", out_path.display()),
        ));
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::models::Page;
    use tempfile::TempDir;

    fn visual(visual_type: &str, fields: &[&str]) -> Visual {
        Visual {
            id: None,
            visual_type: visual_type.to_string(),
            title: None,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn spec() -> VisualSpec {
        VisualSpec {
            report_id: "sales".to_string(),
            generated_at: None,
            pages: vec![
                Page {
                    name: "Overview".to_string(),
                    visuals: vec![
                        visual("PieChart", &["Region", "Orders.Amount", "Sales"]),
                        visual("Table", &[]),
                        visual("mark", &["Profit"]),
                    ],
                },
                Page {
                    name: "Empty".to_string(),
                    visuals: vec![visual("Table", &[])],
                },
            ],
        }
    }

    #[test]
    fn test_layout_header() {
        let layout = LayoutExporter::new().export(&spec(), "Sales");
        assert_eq!(layout.version, "1.13.0");
        assert_eq!(layout.config, json!({"layoutOptimization": 1}));
    }

    #[test]
    fn test_empty_visuals_dropped_pages_kept() {
        let layout = LayoutExporter::new().export(&spec(), "Sales");
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[0].display_name, "Overview");
        assert_eq!(layout.sections[0].visual_containers.len(), 2);
        assert!(layout.sections[1].visual_containers.is_empty());
    }

    #[test]
    fn test_visual_type_mapping() {
        assert_eq!(LayoutExporter::map_visual_type("Table"), "tableEx");
        assert_eq!(LayoutExporter::map_visual_type("PieChart"), "pieChart");
        assert_eq!(LayoutExporter::map_visual_type("bar"), "tableEx");
    }

    #[test]
    fn test_prototype_query() {
        let layout = LayoutExporter::new().export(&spec(), "Sales");
        let pie = &layout.sections[0].visual_containers[0];
        assert_eq!(pie.visual_type, "pieChart");
        assert_eq!(pie.title, "");
        assert_eq!(pie.prototype_query.select.len(), 2);

        let json = serde_json::to_value(pie).unwrap();
        assert_eq!(json["prototypeQuery"]["From"][0]["Name"], "a");
        assert_eq!(json["prototypeQuery"]["From"][0]["Entity"], "Sales");
        assert_eq!(
            json["prototypeQuery"]["Select"][0],
            json!({"Column": {"Expression": {"SourceRef": {"Entity": "Sales"}}, "Property": "Region"}})
        );
    }

    #[test]
    fn test_stable_ids_repeat() {
        let exporter = LayoutExporter::new();
        let first = serde_json::to_string_pretty(&exporter.export(&spec(), "Sales")).unwrap();
        let second = serde_json::to_string_pretty(&exporter.export(&spec(), "Sales")).unwrap();
        assert_eq!(first, second);

        let layout = exporter.export(&spec(), "Sales");
        assert_ne!(layout.sections[0].name, layout.sections[1].name);
    }

    #[test]
    fn test_sequential_ids() {
        let layout = LayoutExporter::with_ids(SequentialIds::default()).export(&spec(), "Sales");
        assert_eq!(layout.sections[0].name, "00000000-0000-0000-0000-000000000001");
        assert_eq!(
            layout.sections[0].visual_containers[0].name,
            "00000000-0000-0000-0000-000000000002"
        );
    }

    #[test]
    fn test_random_ids_are_uuids() {
        let layout = LayoutExporter::with_ids(RandomIds).export(&spec(), "Sales");
        assert!(Uuid::parse_str(&layout.sections[0].name).is_ok());
    }

    #[test]
    fn test_write_layout() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("layout").join("report.json");
        LayoutExporter::new()
            .write(&spec(), "Sales", &out, &NullSink)
            .unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["sections"][1]["displayName"], "Empty");
        assert_eq!(value["sections"][0]["visualContainers"][1]["visualType"], "tableEx");
    }
}
