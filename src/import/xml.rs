//! Tolerant, namespace-agnostic XML loading
//!
//! Builds an owned, order-preserving element tree from `quick-xml` events.
//! Element and attribute names are stored by local name only, because the
//! namespace declarations of workbook files drift between producer versions.
//!
//! The loader recovers instead of failing:
//! - malformed attributes are skipped
//! - an end tag closes up to the nearest open element with the same name,
//!   and is ignored if there is none
//! - elements still open at end of input are closed
//! - after a tokenizer error, reading resumes at the next `<`
//!
//! Only input that yields no root element at all is rejected.

use super::ImportError;
use crate::events::{ConversionEvent, EventKind, EventSink, NullSink, Stage};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One element of a loaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local tag name (any namespace prefix removed)
    pub name: String,
    /// Attributes by local name, in document order
    pub attributes: Vec<(String, String)>,
    /// Trimmed direct text content; empty when the element has none
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attribute value by local name. Empty values are returned as-is.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct text content, `None` when empty.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// All descendants in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// All descendants whose local name is exactly `name`.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |e| e.name == name)
    }

    /// First descendant whose local name is exactly `name`.
    pub fn find_first(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|e| e.name == name)
    }

    /// Visit every descendant with its ancestor chain (outermost first, `self` included).
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a XmlElement, &[&'a XmlElement]),
    {
        let mut ancestors = vec![self];
        Self::walk_children(self, &mut ancestors, visit);
    }

    fn walk_children<'a, F>(
        node: &'a XmlElement,
        ancestors: &mut Vec<&'a XmlElement>,
        visit: &mut F,
    ) where
        F: FnMut(&'a XmlElement, &[&'a XmlElement]),
    {
        for child in &node.children {
            visit(child, ancestors);
            ancestors.push(child);
            Self::walk_children(child, ancestors, visit);
            ancestors.pop();
        }
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Parse XML text, discarding recovery notices.
pub fn parse_xml(text: &str) -> Result<XmlElement, ImportError> {
    parse_xml_with_events(text, &NullSink)
}

fn configured_reader(text: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = false;
    reader
}

/// Parse XML text, reporting every recovery to `events`.
pub fn parse_xml_with_events(
    text: &str,
    events: &dyn EventSink,
) -> Result<XmlElement, ImportError> {
    // byte offset of the current reader's input within `text`
    let mut offset = 0;
    let mut reader = configured_reader(text);

    let mut builder = TreeBuilder::default();
    let recovered = |message: String| {
        events.record(ConversionEvent::warn(
            Stage::Xml,
            EventKind::MarkupRecovered,
            message,
        ));
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let element = element_from_start(e, &recovered);
                builder.open(element);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e, &recovered);
                builder.push_closed(element);
            }
            Ok(Event::End(ref e)) => {
                let name = local_name(e.local_name().as_ref());
                if !builder.close(&name) {
                    recovered(format!("Ignored unmatched end tag </{}>", name));
                }
            }
            Ok(Event::Text(ref t)) => {
                let content = match t.unescape() {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => {
                        recovered("Kept raw text after a failed entity unescape".to_string());
                        String::from_utf8_lossy(t).into_owned()
                    }
                };
                builder.text(&content);
            }
            Ok(Event::CData(ref c)) => {
                builder.text(&String::from_utf8_lossy(c));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                let position = offset + reader.buffer_position() as usize;
                let search_from = position.max(offset + 1);
                let next = text
                    .as_bytes()
                    .get(search_from..)
                    .and_then(|rest| rest.iter().position(|&b| b == b'<'));
                let Some(skip) = next else {
                    recovered(format!("Stopped reading at byte {}: {}", position, e));
                    break;
                };
                offset = search_from + skip;
                recovered(format!(
                    "Skipped malformed markup at byte {}: {} (resuming at byte {})",
                    position, e, offset
                ));
                reader = configured_reader(&text[offset..]);
            }
        }
    }

    if builder.open_count() > 0 {
        recovered(format!(
            "Closed {} element(s) left open at end of input",
            builder.open_count()
        ));
    }

    builder.finish().ok_or_else(|| {
        ImportError::MalformedMarkup("no root element could be recovered".to_string())
    })
}

/// Assembles the tree from open/close notifications.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<XmlElement>,
    root: Option<XmlElement>,
}

impl TreeBuilder {
    fn open(&mut self, element: XmlElement) {
        self.stack.push(element);
    }

    fn push_closed(&mut self, element: XmlElement) {
        self.attach(element);
    }

    /// Close the innermost open element named `name` and everything inside it.
    fn close(&mut self, name: &str) -> bool {
        let Some(depth) = self.stack.iter().rposition(|e| e.name == name) else {
            return false;
        };
        while self.stack.len() > depth {
            if let Some(element) = self.stack.pop() {
                self.attach(element);
            }
        }
        true
    }

    fn text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(current) = self.stack.last_mut() {
            if !current.text.is_empty() {
                current.text.push(' ');
            }
            current.text.push_str(text);
        }
    }

    fn attach(&mut self, element: XmlElement) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(element);
        } else if self.root.is_none() {
            self.root = Some(element);
        }
        // additional top-level elements after the root are dropped
    }

    fn open_count(&self) -> usize {
        self.stack.len()
    }

    fn finish(mut self) -> Option<XmlElement> {
        while let Some(element) = self.stack.pop() {
            self.attach(element);
        }
        self.root
    }
}

fn element_from_start(start: &BytesStart<'_>, recovered: &dyn Fn(String)) -> XmlElement {
    let mut element = XmlElement::new(local_name(start.local_name().as_ref()));

    for attr in start.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(e) => {
                recovered(format!("Skipped malformed attribute on <{}>: {}", element.name, e));
                continue;
            }
        };

        let raw_key = attr.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }

        let key = local_name(attr.key.local_name().as_ref());
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };

        if element.attr(&key).is_none() {
            element.attributes.push((key, value));
        }
    }

    element
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
