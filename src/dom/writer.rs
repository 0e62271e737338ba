//! Serialize a document back to indented XML (the import preview).

use super::arena::{Document, NodeData, NodeId};

/// Render the whole document, XML declaration included.
pub fn to_xml(doc: &Document) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    if let Some(root) = doc.root() {
        write_element(doc, root, 0, &mut out);
    }
    out
}

fn write_element(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let Some(name) = doc.element_name(id) else {
        return;
    };
    let indent = "  ".repeat(depth);

    out.push_str(&indent);
    out.push('<');
    out.push_str(name);
    for attr in doc.attrs(id) {
        out.push_str(&format!(" {}=\"{}\"", attr.name, escape_xml(&attr.value)));
    }

    let children: Vec<NodeId> = doc.children(id).collect();
    if children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    let has_elements = children.iter().any(|&child| doc.is_element(child));
    if !has_elements {
        out.push('>');
        out.push_str(&escape_xml(&doc.text(id)));
        out.push_str(&format!("</{name}>\n"));
        return;
    }

    out.push_str(">\n");
    for child in children {
        match doc.get(child).map(|n| &n.data) {
            Some(NodeData::Element { .. }) => write_element(doc, child, depth + 1, out),
            Some(NodeData::Text(text)) if !text.trim().is_empty() => {
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str(&escape_xml(text.trim()));
                out.push('\n');
            }
            _ => {}
        }
    }
    out.push_str(&format!("{indent}</{name}>\n"));
}

/// Escape text for use in XML content or attribute values.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
