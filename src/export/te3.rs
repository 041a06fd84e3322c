//! Tabular Editor 3 model-authoring script exporter
//!
//! Renders a C# script that creates the ModelSpec's tables, columns,
//! measures and relationships in a tabular model. Code blocks are spliced
//! into a template at the `{{TABLES}}`, `{{MEASURES}}` and
//! `{{RELATIONSHIPS}}` placeholders by plain string replacement.

use super::ExportError;
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::models::{Measure, ModelSpec, SpecColumn, SpecTable};
use crate::validation::input::{sanitize_identifier, single_line};
use crate::validation::relationships::{
    RelationshipCheck, RelationshipValidator, ResolvedRelationship, SkipReason,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Template shipped with the crate.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/apply_modelspec_template.csx");

pub const TABLES_PLACEHOLDER: &str = "{{TABLES}}";
pub const MEASURES_PLACEHOLDER: &str = "{{MEASURES}}";
pub const RELATIONSHIPS_PLACEHOLDER: &str = "{{RELATIONSHIPS}}";

const SCRIPT_PREFIX: &str = "TE3_apply_";
const SCRIPT_EXTENSION: &str = ".csx";

const SKIP_MISSING_ELEMENTS: &str = "// Skipped invalid relationship (missing elements)\n";
const SKIP_TABLE_NOT_FOUND: &str = "// Skipped relationship (table not found)\n";
const SKIP_NAMELESS_MEASURE: &str = "// Skipped measure without a name\n";

/// A rendered script with a summary of what was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRender {
    pub script: String,
    pub relationships_added: usize,
    /// Reasons, in relationship order
    pub relationships_skipped: Vec<SkipReason>,
    pub measures_skipped: usize,
}

/// TE3 script exporter
#[derive(Default)]
pub struct Te3ScriptExporter {
    validator: RelationshipValidator,
}

impl Te3ScriptExporter {
    /// Create a new TE3 script exporter instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Output file name for a report: `TE3_apply_<reportId>.csx`.
    pub fn script_file_name(report_id: &str) -> String {
        format!("{}{}{}", SCRIPT_PREFIX, report_id, SCRIPT_EXTENSION)
    }

    /// Render the script for `spec` into `template`.
    pub fn render(&self, spec: &ModelSpec, template: &str, events: &dyn EventSink) -> ScriptRender {
        let tables = merge_by_handle(&spec.tables, events)
            .iter()
            .map(|(name, columns)| table_block(name, columns))
            .collect::<Vec<_>>()
            .join("\n");

        let mut measures_skipped = 0;
        let measures = spec
            .measures
            .iter()
            .map(|m| match measure_block(m) {
                Some(block) => block,
                None => {
                    measures_skipped += 1;
                    events.record(ConversionEvent::warn(
                        Stage::Script,
                        EventKind::InvalidMeasure,
                        "Skipping measure without a name",
                    ));
                    SKIP_NAMELESS_MEASURE.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut relationships_added = 0;
        let mut relationships_skipped = Vec::new();
        let mut relationship_blocks = Vec::with_capacity(spec.relationships.len());
        for rel in &spec.relationships {
            match self.validator.check(rel, spec) {
                RelationshipCheck::Valid(resolved) => {
                    relationships_added += 1;
                    relationship_blocks.push(relationship_block(&resolved));
                }
                RelationshipCheck::Skipped(reason) => {
                    events.record(ConversionEvent::warn(
                        Stage::Script,
                        EventKind::InvalidRelationship,
                        format!(
                            "Skipping relationship {} -> {}: {}",
                            rel.from_table.as_deref().unwrap_or("?"),
                            rel.to_table.as_deref().unwrap_or("?"),
                            reason
                        ),
                    ));
                    relationship_blocks.push(
                        match reason {
                            SkipReason::MissingElements => SKIP_MISSING_ELEMENTS,
                            SkipReason::TableNotFound { .. } => SKIP_TABLE_NOT_FOUND,
                        }
                        .to_string(),
                    );
                    relationships_skipped.push(reason);
                }
            }
        }
        let relationships = relationship_blocks.join("\n");

        let script = template
            .replace(TABLES_PLACEHOLDER, &tables)
            .replace(MEASURES_PLACEHOLDER, &measures)
            .replace(RELATIONSHIPS_PLACEHOLDER, &relationships);

        ScriptRender {
            script,
            relationships_added,
            relationships_skipped,
            measures_skipped,
        }
    }

    /// Read a template file, or use [`DEFAULT_TEMPLATE`] when `path` is `None`.
    pub fn load_template(path: Option<&Path>) -> Result<String, ExportError> {
        match path {
            None => Ok(DEFAULT_TEMPLATE.to_string()),
            Some(path) if !path.is_file() => Err(ExportError::TemplateNotFound(path.to_path_buf())),
            Some(path) => Ok(fs::read_to_string(path)?),
        }
    }

    /// Render and write `TE3_apply_<reportId>.csx` into `out_dir`.
    ///
    /// The script is looked up again afterwards; not finding it is an error.
    pub fn write(
        &self,
        spec: &ModelSpec,
        template_path: Option<&Path>,
        out_dir: &Path,
        events: &dyn EventSink,
    ) -> Result<PathBuf, ExportError> {
        let template = Self::load_template(template_path)?;
        let render = self.render(spec, &template, events);

        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(Self::script_file_name(&spec.report_id));
        fs::write(&path, &render.script)?;

        Self::find_generated(out_dir, &spec.report_id)?;

        info!(
            "Generated TE3 script: {} ({} relationships, {} skipped)",
            path.display(),
            render.relationships_added,
            render.relationships_skipped.len()
        );
        events.record(ConversionEvent::info(
            Stage::Script,
            EventKind::ArtifactWritten,
            format!("Wrote file: {}", path.display()),
        ));
        Ok(path)
    }

    /// The `TE3_apply_<reportId>.csx` file in `dir`.
    pub fn find_generated(dir: &Path, report_id: &str) -> Result<PathBuf, ExportError> {
        let path = dir.join(Self::script_file_name(report_id));
        if path.is_file() {
            Ok(path)
        } else {
            Err(ExportError::ScriptNotGenerated(dir.to_path_buf()))
        }
    }
}

/// Escape text for a C# regular string literal.
fn csharp_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn table_handle(table: &str) -> String {
    format!("tbl_{}", sanitize_identifier(table))
}

/// Group tables by script handle, in first-seen order.
///
/// A later table whose handle is taken keeps only its columns, appended to
/// the first table's list unless a column with that name is already there.
fn merge_by_handle<'a>(
    tables: &'a [SpecTable],
    events: &dyn EventSink,
) -> Vec<(&'a str, Vec<&'a SpecColumn>)> {
    let mut merged: Vec<(String, &'a str, Vec<&'a SpecColumn>)> = Vec::with_capacity(tables.len());

    for table in tables {
        let handle = table_handle(&table.name);
        match merged.iter_mut().find(|(h, _, _)| *h == handle) {
            Some((_, first, columns)) => {
                events.record(ConversionEvent::warn(
                    Stage::Script,
                    EventKind::DuplicateTable,
                    format!("Table {:?} merged into {:?} as {}", table.name, first, handle),
                ));
                for column in &table.columns {
                    if !columns.iter().any(|c| c.name == column.name) {
                        columns.push(column);
                    }
                }
            }
            None => merged.push((handle, table.name.as_str(), table.columns.iter().collect())),
        }
    }

    merged
        .into_iter()
        .map(|(_, name, columns)| (name, columns))
        .collect()
}

fn table_block(table_name: &str, columns: &[&SpecColumn]) -> String {
    let handle = table_handle(table_name);
    let name = csharp_literal(table_name);

    let mut lines = vec![
        format!("// ---- Table: {} ----", single_line(table_name)),
        format!(
            "var {handle} = Model.Tables.Find(\"{name}\") ?? Model.AddTable(\"{name}\");"
        ),
    ];

    for column in columns {
        let column_name = csharp_literal(&column.name);
        let data_type = column.column_type.script_data_type();
        lines.push(format!(
            "if (!{handle}.Columns.Contains(\"{column_name}\")) {{ \
             var c = {handle}.AddDataColumn(\"{column_name}\"); \
             c.DataType = {data_type}; \
             LogInfo(\"Added column: {column_name} ({data_type})\"); }}"
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// `None` for measures without a usable name.
fn measure_block(measure: &Measure) -> Option<String> {
    let name = measure.name.as_deref().filter(|n| !n.trim().is_empty())?;
    let expression = match measure.expression.as_deref() {
        Some(expr) if !expr.is_empty() => expr.to_string(),
        _ => format!("// TODO: Define expression for {}", single_line(name)),
    };

    let name_literal = csharp_literal(name);
    let expr_literal = csharp_literal(&expression);

    let lines = [
        format!("// ---- Measure: {} ----", single_line(name)),
        "{".to_string(),
        format!("    var m = Model.AllMeasures.FirstOrDefault(x => x.Name == \"{name_literal}\");"),
        "    if (m == null) {".to_string(),
        format!("        m = Model.AddMeasure(\"{name_literal}\", \"{expr_literal}\");"),
        "        LogInfo($\"Created measure: {m.Name}\");".to_string(),
        "    } else {".to_string(),
        format!("        m.Expression = \"{expr_literal}\";"),
        "        LogInfo($\"Updated measure: {m.Name}\");".to_string(),
        "    }".to_string(),
        "}".to_string(),
        String::new(),
    ];
    Some(lines.join("\n"))
}

fn relationship_block(rel: &ResolvedRelationship) -> String {
    let lines = [
        format!(
            "// ---- Relationship: {}.{} → {}.{} ----",
            rel.from_table, rel.from_column, rel.to_table, rel.to_column
        ),
        format!(
            "Model.AddRelationship({}, \"{}\", {}, \"{}\");",
            table_handle(&rel.from_table),
            csharp_literal(&rel.from_column),
            table_handle(&rel.to_table),
            csharp_literal(&rel.to_column)
        ),
        String::new(),
    ];
    lines.join("\n")
}
