//! Lowercasing XML loader.
//!
//! Blackboard exports mix `CONTENTHANDLER`, `ContentHandler` and
//! `contenthandler` freely. Every element and attribute name is folded to
//! ASCII lowercase here, once, so traversal code can match exact lowercase
//! names. Attribute values and text are kept as written (entities decoded).

use std::fs;
use std::io;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

use super::arena::{Attribute, Document, NodeId};
use crate::error::{Error, Result};
use crate::util::{decode_text, extract_xml_encoding};

/// Load and normalize an XML file.
///
/// Returns `Ok(None)` when `path` does not exist, so callers can tell "no
/// file" apart from "unreadable file" (which is an error).
pub fn load(path: &Path) -> Result<Option<Document>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    parse_bytes(&bytes, &path.display().to_string()).map(Some)
}

/// Parse raw bytes, detecting the encoding. `location` names the source in
/// error messages.
pub fn parse_bytes(bytes: &[u8], location: &str) -> Result<Document> {
    let content = decode_text(bytes, extract_xml_encoding(bytes));
    build(&content).map_err(|reason| Error::Xml {
        location: location.to_string(),
        reason,
    })
}

/// Parse an in-memory XML string.
pub fn parse_str(content: &str) -> Result<Document> {
    parse_bytes(content.as_bytes(), "<string>")
}

fn build(content: &str) -> std::result::Result<Document, String> {
    let mut reader = Reader::from_str(content);

    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.document()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let id = open_element(&mut doc, &stack, &e)?;
                stack.push(id);
            }
            Ok(Event::Empty(e)) => {
                open_element(&mut doc, &stack, &e)?;
            }
            Ok(Event::End(_)) => {
                if let Some(id) = stack.pop() {
                    drop_layout_whitespace(&mut doc, id);
                }
            }
            Ok(Event::Text(e)) => {
                if stack.len() > 1 {
                    // References arrive separately as `GeneralRef`.
                    doc.append_text(current(&stack), &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if stack.len() > 1 {
                    doc.append_text(current(&stack), &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if stack.len() > 1 {
                    let parent = current(&stack);
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        doc.append_text(parent, ch.encode_utf8(&mut [0; 4]));
                    } else {
                        let name = String::from_utf8_lossy(e.as_ref());
                        match resolve_predefined_entity(&name) {
                            Some(resolved) => doc.append_text(parent, resolved),
                            // Undeclared (HTML) entities stay as written.
                            None => doc.append_text(parent, &format!("&{name};")),
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "{e} at byte {}",
                    reader.error_position()
                ));
            }
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = stack
            .last()
            .and_then(|&id| doc.element_name(id))
            .unwrap_or_default()
            .to_string();
        return Err(format!("unexpected end of document inside <{open}>"));
    }
    if doc.root().is_none() {
        return Err("document has no root element".to_string());
    }

    Ok(doc)
}

fn current(stack: &[NodeId]) -> NodeId {
    stack.last().copied().unwrap_or(NodeId::NONE)
}

/// Create an element with lowercased names and append it to the innermost
/// open element. A second top-level element is an error.
fn open_element(
    doc: &mut Document,
    stack: &[NodeId],
    e: &BytesStart<'_>,
) -> std::result::Result<NodeId, String> {
    let name = lowercase_name(e.name().as_ref());
    if stack.len() == 1
        && let Some(root) = doc.root()
    {
        let first = doc.element_name(root).unwrap_or_default();
        return Err(format!("second root element <{name}> after <{first}>"));
    }
    let parent = current(stack);

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("bad attribute on <{name}>: {err}"))?;
        let key = lowercase_name(attr.key.as_ref());
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).unwrap_or(raw.clone()).into_owned();
        attrs.push(Attribute::new(key, value));
    }

    let id = doc.create_element(name, attrs);
    doc.append(parent, id);
    Ok(id)
}

fn lowercase_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

/// Indentation between child elements is not content.
fn drop_layout_whitespace(doc: &mut Document, id: NodeId) {
    if doc.children(id).any(|child| doc.is_element(child)) && doc.text(id).trim().is_empty() {
        doc.clear_text(id);
    }
}
