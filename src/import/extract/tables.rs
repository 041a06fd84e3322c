//! Table and column extraction
//!
//! Workbooks rarely declare tables in one canonical place. Columns are
//! gathered from every column-like element and attributed to a table by
//! inference; explicit `table` elements then add or extend tables.

use super::ExtractOptions;
use super::fallback::{
    FieldChain,
    FieldSource::{Attr, Text},
    name_is,
};
use crate::events::EventSink;
use crate::import::xml::XmlElement;
use crate::models::{ColumnMeta, TableMeta, UNNAMED_TABLE};

const COLUMN_TAGS: &[&str] = &[
    "column",
    "column-instance",
    "column-group",
    "column-definition",
];
const DATASOURCE_TAGS: &[&str] = &["datasource", "data-source"];

const COLUMN_NAME: FieldChain =
    FieldChain::new(&[Attr("caption"), Attr("name"), Attr("column-name"), Text]);
const COLUMN_TYPE: FieldChain =
    FieldChain::new(&[Attr("datatype"), Attr("type"), Attr("data-type")]);
const OWNER_NAME: FieldChain = FieldChain::new(&[Attr("name"), Attr("caption")]);

const TABLE_NAME: FieldChain = FieldChain::new(&[Attr("name"), Attr("caption")]);
const TABLE_COLUMN_NAME: FieldChain = FieldChain::new(&[Attr("name"), Attr("caption"), Text]);
const TABLE_COLUMN_TYPE: FieldChain = FieldChain::new(&[Attr("datatype"), Attr("type")]);

/// Extract tables in first-seen order.
///
/// A column's owner is its own `table` attribute, else the name (or caption)
/// of its nearest enclosing datasource, else [`UNNAMED_TABLE`]. Nameless
/// columns are skipped.
pub fn extract_tables(
    root: &XmlElement,
    _options: &ExtractOptions,
    _events: &dyn EventSink,
) -> Vec<TableMeta> {
    let mut tables = TableSet::default();

    root.walk(&mut |node, ancestors| {
        if !name_is(node, COLUMN_TAGS) {
            return;
        }
        let Some(name) = COLUMN_NAME.resolve(node) else {
            return;
        };

        let owner = node
            .attr("table")
            .filter(|t| !t.is_empty())
            .or_else(|| {
                ancestors
                    .iter()
                    .rev()
                    .find(|a| name_is(a, DATASOURCE_TAGS))
                    .and_then(|ds| OWNER_NAME.resolve(ds))
            })
            .unwrap_or(UNNAMED_TABLE);

        tables
            .entry(owner)
            .columns
            .push(ColumnMeta::new(name, COLUMN_TYPE.resolve(node)));
    });

    for table in root.find_all("table") {
        let Some(table_name) = TABLE_NAME.resolve(table) else {
            continue;
        };
        let columns: Vec<ColumnMeta> = table
            .find_all("column")
            .filter_map(|c| {
                TABLE_COLUMN_NAME
                    .resolve(c)
                    .map(|n| ColumnMeta::new(n, TABLE_COLUMN_TYPE.resolve(c)))
            })
            .collect();
        tables.entry(table_name).columns.extend(columns);
    }

    tables.0
}

/// Tables in insertion order, addressed by name.
#[derive(Default)]
struct TableSet(Vec<TableMeta>);

impl TableSet {
    fn entry(&mut self, name: &str) -> &mut TableMeta {
        let idx = match self.0.iter().position(|t| t.name == name) {
            Some(idx) => idx,
            None => {
                self.0.push(TableMeta::new(name));
                self.0.len() - 1
            }
        };
        &mut self.0[idx]
    }
}
