//! Connection block extraction

use super::ExtractOptions;
use super::fallback::collect_named;
use crate::events::EventSink;
use crate::import::xml::XmlElement;
use crate::models::Connection;
use std::collections::HashSet;

const CONNECTION_TAGS: &[&str] = &["connection", "connection-info"];

/// Extract connection blocks anywhere in the document.
///
/// Attributes are copied first; non-empty child texts are added when their
/// key is not already present. Blocks are deduplicated by their sorted-key
/// JSON signature.
pub fn extract_connections(
    root: &XmlElement,
    _options: &ExtractOptions,
    _events: &dyn EventSink,
) -> Vec<Connection> {
    let mut seen = HashSet::new();
    let mut connections = Vec::new();

    for node in collect_named(root, CONNECTION_TAGS) {
        let mut info: Connection = node.attributes.iter().cloned().collect();
        for child in &node.children {
            if let Some(text) = child.text() {
                info.entry(child.name.clone())
                    .or_insert_with(|| text.to_string());
            }
        }

        if seen.insert(signature(&info)) {
            connections.push(info);
        }
    }

    connections
}

/// Canonical signature; `Connection` is a sorted map so key order is stable.
fn signature(info: &Connection) -> String {
    serde_json::to_string(info).unwrap_or_default()
}
