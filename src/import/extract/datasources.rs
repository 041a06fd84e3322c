//! Datasource extraction

use super::ExtractOptions;
use super::fallback::{FieldChain, FieldSource::Attr, collect_named, name_contains, name_is};
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::import::xml::XmlElement;
use crate::models::Datasource;
use std::collections::{BTreeMap, HashSet};

const DATASOURCE_TAGS: &[&str] = &["datasource", "data-source"];
const CONNECTION_TAGS: &[&str] = &["connection", "connection-info", "connectionType"];
const QUERY_FRAGMENTS: &[&str] = &["custom-sql", "customsql", "query", "sql"];

const DATASOURCE_ID: FieldChain = FieldChain::new(&[
    Attr("name"),
    Attr("caption"),
    Attr("formula"),
    Attr("id"),
    Attr("datasource-id"),
    Attr("class"),
]);
const DATASOURCE_NAME: FieldChain = FieldChain::new(&[Attr("caption"), Attr("name")]);
const CONNECTION_TYPE: FieldChain =
    FieldChain::new(&[Attr("class"), Attr("connection-class"), Attr("type")]);

/// Extract datasource declarations, deduplicated by id.
///
/// Nodes are taken as all `datasource` elements followed by all
/// `data-source` elements. A datasource without any id attribute gets
/// `datasource_<n>` where `n` is one more than the number kept so far.
pub fn extract_datasources(
    root: &XmlElement,
    _options: &ExtractOptions,
    events: &dyn EventSink,
) -> Vec<Datasource> {
    let mut datasources: Vec<Datasource> = Vec::new();
    let mut seen_ids = HashSet::new();

    for node in collect_named(root, DATASOURCE_TAGS) {
        let id = DATASOURCE_ID
            .resolve_owned(node)
            .unwrap_or_else(|| format!("datasource_{}", datasources.len() + 1));

        if !seen_ids.insert(id.clone()) {
            events.record(ConversionEvent::debug(
                Stage::Extract,
                EventKind::DuplicateDatasource,
                format!("Skipped repeated datasource declaration: {}", id),
            ));
            continue;
        }

        let (connection_type, connection) = first_connection(node);

        datasources.push(Datasource {
            id,
            name: DATASOURCE_NAME.resolve_owned(node),
            connection_type,
            connection,
            query: native_query(node),
        });
    }

    datasources
}

/// Type and flattened attributes of the first connection-like descendant.
fn first_connection(datasource: &XmlElement) -> (Option<String>, BTreeMap<String, String>) {
    let mut info = BTreeMap::new();
    let Some(node) = datasource
        .descendants()
        .find(|e| name_is(e, CONNECTION_TAGS))
    else {
        return (None, info);
    };

    for (key, value) in &node.attributes {
        info.insert(key.clone(), value.clone());
    }
    for child in &node.children {
        info.insert(child.name.clone(), child.text.clone());
    }

    (CONNECTION_TYPE.resolve_owned(node), info)
}

/// First non-empty text of a descendant that looks like a custom query.
fn native_query(datasource: &XmlElement) -> Option<String> {
    datasource
        .descendants()
        .filter(|e| name_contains(e, QUERY_FRAGMENTS))
        .find_map(XmlElement::text)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CollectingSink, NullSink};
    use crate::import::xml::parse_xml;

    fn extract(xml: &str) -> Vec<Datasource> {
        let root = parse_xml(xml).unwrap();
        extract_datasources(&root, &ExtractOptions::default(), &NullSink)
    }

    #[test]
    fn test_datasource_with_connection_and_query() {
        let sources = extract(
            r#"<workbook><datasources>
                 <datasource name="federated.1" caption="Orders">
                   <connection class="sqlserver" server="db01">
                     <dbname> sales </dbname>
                   </connection>
                   <relation type="text" name="Custom SQL Query">SELECT * FROM orders</relation>
                 </datasource>
               </datasources></workbook>"#,
        );

        assert_eq!(sources.len(), 1);
        let ds = &sources[0];
        assert_eq!(ds.id, "federated.1");
        assert_eq!(ds.name.as_deref(), Some("Orders"));
        assert_eq!(ds.connection_type.as_deref(), Some("sqlserver"));
        assert_eq!(ds.connection.get("server").map(String::as_str), Some("db01"));
        assert_eq!(ds.connection.get("dbname").map(String::as_str), Some("sales"));
        assert_eq!(ds.query, None);
    }

    #[test]
    fn test_custom_sql_query_is_captured() {
        let sources = extract(
            "<workbook><datasource name='d'><custom-sql>SELECT 1</custom-sql></datasource></workbook>",
        );
        assert_eq!(sources[0].query.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_duplicate_ids_are_skipped() {
        let root = parse_xml(
            "<workbook><datasource name='a'/><datasource name='a'/><data-source caption='b'/></workbook>",
        )
        .unwrap();
        let sink = CollectingSink::new();
        let sources = extract_datasources(&root, &ExtractOptions::default(), &sink);

        let ids: Vec<&str> = sources.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(sink.count(EventKind::DuplicateDatasource), 1);
    }

    #[test]
    fn test_synthesized_id() {
        let sources = extract("<workbook><datasource name='x'/><datasource/></workbook>");
        assert_eq!(sources[1].id, "datasource_2");
        assert_eq!(sources[1].name, None);
        assert!(sources[1].connection.is_empty());
    }

    #[test]
    fn test_no_datasources() {
        assert!(extract("<workbook/>").is_empty());
    }
}
