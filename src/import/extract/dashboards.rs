//! Dashboard extraction

use super::ExtractOptions;
use super::fallback::{
    FieldChain,
    FieldSource::{Attr, Text},
    name_contains,
};
use crate::events::EventSink;
use crate::import::xml::XmlElement;
use crate::models::{Dashboard, DashboardItem};

const ITEM_FRAGMENTS: &[&str] = &["zone", "worksheet", "view", "object"];

const DASHBOARD_NAME: FieldChain = FieldChain::new(&[Attr("name"), Attr("caption"), Text]);
const ITEM_REF: FieldChain =
    FieldChain::new(&[Attr("sheet"), Attr("worksheet"), Attr("source"), Text]);

/// Extract dashboards and the zones / objects placed on them.
pub fn extract_dashboards(
    root: &XmlElement,
    _options: &ExtractOptions,
    _events: &dyn EventSink,
) -> Vec<Dashboard> {
    root.find_all("dashboard")
        .filter_map(|node| {
            let name = DASHBOARD_NAME.resolve_owned(node)?;
            let items = node
                .descendants()
                .filter(|e| name_contains(e, ITEM_FRAGMENTS))
                .map(|item| DashboardItem {
                    id: item.attr("id").map(str::to_string),
                    reference: ITEM_REF.resolve_owned(item),
                    item_type: item.name.clone(),
                })
                .collect();
            Some(Dashboard { name, items })
        })
        .collect()
}
