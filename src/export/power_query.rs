//! Power Query (M) data-access expression exporter
//!
//! One connector template per [`SourceType`]. Config values are interpolated
//! verbatim; they are trusted to be expression-safe.

use super::ExportError;
use crate::models::{SourceConfig, SourceType};

/// Power Query exporter
#[derive(Debug, Default)]
pub struct PowerQueryExporter;

impl PowerQueryExporter {
    /// Create a new Power Query exporter instance
    pub fn new() -> Self {
        Self
    }

    /// Render the data-access expression for a source tag such as `"excel"`.
    pub fn export_tag(
        &self,
        source_type: &str,
        config: &SourceConfig,
    ) -> Result<String, ExportError> {
        let source_type: SourceType = source_type.parse()?;
        self.export(source_type, config)
    }

    /// Render the data-access expression for `source_type`.
    ///
    /// # Errors
    ///
    /// [`ExportError::MissingConfigKey`] for the first required key absent
    /// from `config` (see [`SourceType::required_keys`]).
    pub fn export(
        &self,
        source_type: SourceType,
        config: &SourceConfig,
    ) -> Result<String, ExportError> {
        let get = |key: &str| {
            config.value(key).ok_or_else(|| ExportError::MissingConfigKey {
                source_type,
                key: key.to_string(),
            })
        };

        let text = match source_type {
            SourceType::Excel => {
                let (url, sheet) = (get("url")?, get("sheet")?);
                format!(
                    r#"
let
    Source = Excel.Workbook(
        Web.Contents("{url}"),
        null,
        true
    ),
    Data = Source{{[Item="{sheet}",Kind="Sheet"]}}[Data],
    PromotedHeaders = Table.PromoteHeaders(Data)
in
    PromotedHeaders
"#
                )
            }
            SourceType::SharePoint => {
                let (site, file, sheet) = (get("site")?, get("file")?, get("sheet")?);
                format!(
                    r#"
let
    Source = SharePoint.Files("{site}", [ApiVersion=15]),
    File = Source{{[Name="{file}"]}}[Content],
    Data = Excel.Workbook(File, null, true),
    Sheet = Data{{[Item="{sheet}",Kind="Sheet"]}}[Data],
    PromotedHeaders = Table.PromoteHeaders(Sheet)
in
    PromotedHeaders
"#
                )
            }
            SourceType::Sql => {
                let (server, database, schema, table) =
                    (get("server")?, get("database")?, get("schema")?, get("table")?);
                format!(
                    r#"
let
    Source = Sql.Database("{server}", "{database}"),
    Table = Source{{[Schema="{schema}",Item="{table}"]}}[Data]
in
    Table
"#
                )
            }
            SourceType::Fabric => {
                let (workspace, lakehouse, table) =
                    (get("workspace")?, get("lakehouse")?, get("table")?);
                format!(
                    r#"
let
    Source = Fabric.Warehouse("{workspace}", "{lakehouse}"),
    Table = Source{{[Schema="dbo",Item="{table}"]}}[Data]
in
    Table
"#
                )
            }
        };

        Ok(text)
    }
}
