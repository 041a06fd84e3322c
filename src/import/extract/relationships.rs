//! Join / relationship extraction

use super::ExtractOptions;
use super::fallback::{FieldChain, FieldSource::Attr, collect_named};
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use crate::import::xml::XmlElement;
use crate::models::RelationshipMeta;

const RELATIONSHIP_TAGS: &[&str] = &["relation", "join", "relationship"];

const FROM_TABLE: FieldChain = FieldChain::new(&[
    Attr("left-table"),
    Attr("from-table"),
    Attr("table1"),
    Attr("left"),
]);
const TO_TABLE: FieldChain = FieldChain::new(&[
    Attr("right-table"),
    Attr("to-table"),
    Attr("table2"),
    Attr("right"),
]);
const FROM_COLUMN: FieldChain =
    FieldChain::new(&[Attr("left-column"), Attr("from-column"), Attr("left-field")]);
const TO_COLUMN: FieldChain =
    FieldChain::new(&[Attr("right-column"), Attr("to-column"), Attr("right-field")]);
const CARDINALITY: FieldChain = FieldChain::new(&[Attr("cardinality"), Attr("type")]);

/// Extract every relation/join/relationship node as a directional record.
///
/// Records with missing endpoints are kept with `None` fields; each one is
/// reported as [`EventKind::InvalidRelationship`].
pub fn extract_relationships(
    root: &XmlElement,
    _options: &ExtractOptions,
    events: &dyn EventSink,
) -> Vec<RelationshipMeta> {
    collect_named(root, RELATIONSHIP_TAGS)
        .into_iter()
        .map(|node| {
            let rel = RelationshipMeta {
                from_table: FROM_TABLE.resolve_owned(node),
                from_column: FROM_COLUMN.resolve_owned(node),
                to_table: TO_TABLE.resolve_owned(node),
                to_column: TO_COLUMN.resolve_owned(node),
                cardinality: CARDINALITY.resolve_owned(node),
            };
            if !rel.is_complete() {
                events.record(ConversionEvent::debug(
                    Stage::Extract,
                    EventKind::InvalidRelationship,
                    format!("Incomplete <{}> relationship endpoints", node.name),
                ));
            }
            rel
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingSink;
    use crate::import::xml::parse_xml;

    #[test]
    fn test_relationship_fallbacks() {
        let root = parse_xml(
            r#"<workbook>
                 <relationship from-table="A" from-column="id" to-table="B" to-column="a_id" cardinality="many-to-one"/>
                 <join left="A" right="C" left-field="id" right-field="a_id" type="inner"/>
               </workbook>"#,
        )
        .unwrap();
        let sink = CollectingSink::new();
        let rels = extract_relationships(&root, &ExtractOptions::default(), &sink);

        // relation nodes first, then join, then relationship
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].to_table.as_deref(), Some("C"));
        assert_eq!(rels[0].cardinality.as_deref(), Some("inner"));
        assert_eq!(rels[1], {
            let mut expected = RelationshipMeta::between("A", "id", "B", "a_id");
            expected.cardinality = Some("many-to-one".to_string());
            expected
        });
        assert_eq!(sink.count(EventKind::InvalidRelationship), 0);
    }

    #[test]
    fn test_incomplete_relationship_is_kept_and_reported() {
        let root =
            parse_xml("<workbook><relation type='table' name='[Orders]'/></workbook>").unwrap();
        let sink = CollectingSink::new();
        let rels = extract_relationships(&root, &ExtractOptions::default(), &sink);

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].from_table, None);
        assert_eq!(rels[0].cardinality.as_deref(), Some("table"));
        assert_eq!(sink.count(EventKind::InvalidRelationship), 1);
    }
}
