//! Ordered field fallback chains
//!
//! Workbook producers spell the same concept several ways, so every field is
//! read through a static list of sources tried in order. The first non-empty
//! value wins.

use crate::import::xml::XmlElement;

/// Where a field value may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Attribute with this local name
    Attr(&'static str),
    /// The element's own trimmed text
    Text,
}

/// Ordered list of field sources.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain(&'static [FieldSource]);

impl FieldChain {
    pub const fn new(sources: &'static [FieldSource]) -> Self {
        Self(sources)
    }

    /// First non-empty value produced by the chain.
    pub fn resolve<'a>(&self, element: &'a XmlElement) -> Option<&'a str> {
        self.0.iter().find_map(|source| {
            let value = match source {
                FieldSource::Attr(name) => element.attr(name),
                FieldSource::Text => element.text(),
            };
            value.filter(|v| !v.is_empty())
        })
    }

    /// Owned variant of [`FieldChain::resolve`].
    pub fn resolve_owned(&self, element: &XmlElement) -> Option<String> {
        self.resolve(element).map(str::to_string)
    }
}

/// True when `element`'s local name equals one of `names`.
pub fn name_is(element: &XmlElement, names: &[&str]) -> bool {
    names.iter().any(|n| element.name == *n)
}

/// True when `element`'s local name contains one of `fragments`.
pub fn name_contains(element: &XmlElement, fragments: &[&str]) -> bool {
    fragments.iter().any(|f| element.name.contains(f))
}

/// Descendants of `root` whose local name equals each of `names`, grouped by
/// name in the order given and in document order within a group.
pub fn collect_named<'a>(root: &'a XmlElement, names: &[&str]) -> Vec<&'a XmlElement> {
    let mut nodes = Vec::new();
    for name in names {
        nodes.extend(root.descendants().filter(|e| e.name == *name));
    }
    nodes
}
