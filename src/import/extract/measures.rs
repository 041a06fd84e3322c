//! Calculated field / measure extraction

use super::ExtractOptions;
use super::fallback::{FieldChain, FieldSource::Attr, name_contains};
use crate::events::EventSink;
use crate::import::xml::XmlElement;
use crate::models::Measure;
use std::collections::HashSet;

const MEASURE_FRAGMENTS: &[&str] = &["calculation", "calculated", "formula"];
const EXPRESSION_FRAGMENTS: &[&str] = &["formula", "expression", "calculation"];

const MEASURE_NAME: FieldChain =
    FieldChain::new(&[Attr("caption"), Attr("name"), Attr("field-name")]);

/// Extract calculated fields, deduplicated by `(name, expression)`.
///
/// The expression is the node's own text, else the text of the first nested
/// formula/expression/calculation element. Nodes with neither a name nor an
/// expression are discarded.
pub fn extract_measures(
    root: &XmlElement,
    _options: &ExtractOptions,
    _events: &dyn EventSink,
) -> Vec<Measure> {
    let mut seen = HashSet::new();
    let mut measures = Vec::new();

    for node in root.descendants() {
        if !name_contains(node, MEASURE_FRAGMENTS) {
            continue;
        }

        let name = MEASURE_NAME.resolve(node);
        let expression = node.text().or_else(|| {
            node.descendants()
                .filter(|e| name_contains(e, EXPRESSION_FRAGMENTS))
                .find_map(XmlElement::text)
        });

        if name.is_none() && expression.is_none() {
            continue;
        }

        let measure = Measure {
            name: name.map(str::to_string),
            expression: expression.map(str::to_string),
        };
        if seen.insert(measure.clone()) {
            measures.push(measure);
        }
    }

    measures
}
