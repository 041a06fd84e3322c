//! Worksheet and visual extraction

use super::ExtractOptions;
use super::fallback::{
    FieldChain,
    FieldSource::{Attr, Text},
    collect_named, name_contains, name_is,
};
use crate::events::EventSink;
use crate::import::xml::XmlElement;
use crate::models::{Visual, Worksheet};
use std::collections::HashSet;

const WORKSHEET_TAGS: &[&str] = &["worksheet", "view", "sheet"];
const NAME_CHILD_TAGS: &[&str] = &["name", "caption"];
const VISUAL_FRAGMENTS: &[&str] = &["mark", "viz", "view", "worksheet"];
const FIELD_TAGS: &[&str] = &["field", "column", "ref", "attribute"];

const WORKSHEET_NAME: FieldChain = FieldChain::new(&[Attr("name"), Attr("caption"), Text]);
const VISUAL_TYPE: FieldChain = FieldChain::new(&[Attr("type"), Attr("class")]);
const VISUAL_TITLE: FieldChain = FieldChain::new(&[Attr("title"), Attr("caption")]);
const FIELD_NAME: FieldChain = FieldChain::new(&[Attr("name"), Attr("caption"), Text]);

/// Extract worksheets with a bounded number of visuals each.
///
/// Worksheets are deduplicated by name; nameless ones are skipped.
pub fn extract_worksheets(
    root: &XmlElement,
    options: &ExtractOptions,
    _events: &dyn EventSink,
) -> Vec<Worksheet> {
    let mut seen = HashSet::new();
    let mut worksheets = Vec::new();

    for node in collect_named(root, WORKSHEET_TAGS) {
        let Some(name) = worksheet_name(node) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }

        let visuals = node
            .descendants()
            .filter(|e| name_contains(e, VISUAL_FRAGMENTS))
            .take(options.visual_limit)
            .map(visual_from)
            .collect();

        worksheets.push(Worksheet {
            name: name.to_string(),
            visuals,
        });
    }

    worksheets
}

fn worksheet_name(node: &XmlElement) -> Option<&str> {
    WORKSHEET_NAME.resolve(node).or_else(|| {
        node.descendants()
            .find(|e| name_is(e, NAME_CHILD_TAGS))
            .and_then(XmlElement::text)
    })
}

fn visual_from(node: &XmlElement) -> Visual {
    let fields = node
        .descendants()
        .filter(|e| name_is(e, FIELD_TAGS))
        .filter_map(|e| FIELD_NAME.resolve_owned(e))
        .collect();

    Visual {
        id: node.attr("id").filter(|id| !id.is_empty()).map(str::to_string),
        visual_type: VISUAL_TYPE
            .resolve_owned(node)
            .unwrap_or_else(|| node.name.clone()),
        title: VISUAL_TITLE.resolve_owned(node),
        fields,
    }
}
