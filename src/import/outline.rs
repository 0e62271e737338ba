//! Flattened view of an annotated manifest, for previews and reports.

use std::collections::BTreeMap;

use serde::Serialize;

use super::classify::CanvasType;
use crate::config::ImportConfig;
use crate::dom::{Document, NodeId};

/// One `item` of the manifest, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifierref: Option<String>,
    /// `None` when the walk left the item unannotated.
    pub import_type: Option<CanvasType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_level: Option<u32>,
}

/// Flatten every `item` under `container` (depth-first, document order).
pub fn outline(doc: &Document, container: NodeId, config: &ImportConfig) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    collect(doc, container, config, &mut entries);
    entries
}

fn collect(doc: &Document, container: NodeId, config: &ImportConfig, out: &mut Vec<OutlineEntry>) {
    for item in doc.child_elements(container, "item") {
        let title = doc
            .first_child_element(item, "title")
            .map(|title| doc.text(title).trim().to_string())
            .unwrap_or_default();

        out.push(OutlineEntry {
            title,
            identifierref: doc.attr(item, "identifierref").map(str::to_owned),
            import_type: doc
                .attr(item, &config.import_type_attr)
                .and_then(|tag| tag.parse().ok()),
            indent_level: doc
                .attr(item, &config.indent_level_attr)
                .and_then(|level| level.parse().ok()),
        });
        collect(doc, item, config, out);
    }
}

/// Item counts per Canvas type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub by_type: BTreeMap<CanvasType, usize>,
    pub unannotated: usize,
}

impl Summary {
    pub fn from_outline(entries: &[OutlineEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.import_type {
                Some(ty) => *summary.by_type.entry(ty).or_default() += 1,
                None => summary.unannotated += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.by_type.values().sum::<usize>() + self.unannotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_str;

    #[test]
    fn test_outline_and_summary() {
        let doc = parse_str(
            r#"<organization>
  <item import-type="MODULE"><title> Week 1 </title>
    <item identifierref="res1" import-type="PAGE" indent-level="0"><title>Reading</title></item>
    <item identifierref="res2" import-type="PAGE" indent-level="0"><title>Notes</title></item>
  </item>
  <item identifierref="res3"><title>Mystery</title></item>
</organization>"#,
        )
        .unwrap();
        let config = ImportConfig::default();

        let entries = outline(&doc, doc.root().unwrap(), &config);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].title, "Week 1");
        assert_eq!(entries[0].import_type, Some(CanvasType::Module));
        assert_eq!(entries[0].indent_level, None);
        assert_eq!(entries[1].identifierref.as_deref(), Some("res1"));
        assert_eq!(entries[1].indent_level, Some(0));
        assert_eq!(entries[3].import_type, None);

        let summary = Summary::from_outline(&entries);
        assert_eq!(summary.by_type.get(&CanvasType::Page), Some(&2));
        assert_eq!(summary.by_type.get(&CanvasType::Module), Some(&1));
        assert_eq!(summary.unannotated, 1);
        assert_eq!(summary.total(), 4);
    }
}
