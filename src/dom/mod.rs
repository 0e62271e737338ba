//! Case-normalized XML document model.
//!
//! [`load`] reads a file into an arena-backed [`Document`] whose element and
//! attribute names are all lowercase; [`to_xml`] writes one back out.

mod arena;
mod loader;
mod writer;

pub use arena::{Attribute, Children, Document, Node, NodeData, NodeId};
pub use loader::{load, parse_bytes, parse_str};
pub use writer::{escape_xml, to_xml};
