//! Workbook title lookup

use super::ExtractOptions;
use crate::events::EventSink;
use crate::import::xml::XmlElement;

/// Workbook title: root `name` attribute, then the first `document-name`
/// text, then the first `title` text. `None` lets the caller fall back to
/// the file stem.
pub fn extract_title(
    root: &XmlElement,
    _options: &ExtractOptions,
    _events: &dyn EventSink,
) -> Option<String> {
    if let Some(name) = root.attr("name").filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }

    ["document-name", "title"]
        .iter()
        .find_map(|tag| root.find_first(tag).and_then(XmlElement::text))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::import::xml::parse_xml;

    fn title_of(xml: &str) -> Option<String> {
        let root = parse_xml(xml).unwrap();
        extract_title(&root, &ExtractOptions::default(), &NullSink)
    }

    #[test]
    fn test_title_from_root_name() {
        assert_eq!(
            title_of("<workbook name='Sales'><title>Other</title></workbook>"),
            Some("Sales".to_string())
        );
    }

    #[test]
    fn test_title_from_document_name_then_title() {
        assert_eq!(
            title_of("<workbook><title>T</title><document-name>Doc</document-name></workbook>"),
            Some("Doc".to_string())
        );
        assert_eq!(
            title_of("<workbook><title>T</title></workbook>"),
            Some("T".to_string())
        );
    }

    #[test]
    fn test_no_title() {
        assert_eq!(title_of("<workbook/>"), None);
    }
}
