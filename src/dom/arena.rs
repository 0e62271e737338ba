//! Arena-backed XML document tree.
//!
//! Nodes live in one contiguous vector and link to each other by index, so
//! a walker can hold a `NodeId` while mutating the document through `&mut`.
//! Attribute annotation is append-only: nothing in this API removes or
//! reorders nodes, and an existing attribute is never overwritten.

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// An element attribute. Names are stored lowercase by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root (holds the single document element).
    Document,
    /// Element with name and ordered attributes.
    Element { name: String, attrs: Vec<Attribute> },
    /// Character data (text, CDATA and resolved entities, merged).
    Text(String),
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Ordered, mutable XML tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the document root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        doc.document = doc.alloc(Node::new(NodeData::Document));
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID (the parent of the document element).
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The document element, if one has been appended.
    pub fn root(&self) -> Option<NodeId> {
        self.children(self.document).find(|&id| self.is_element(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, name: impl Into<String>, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(Node::new(NodeData::Element {
            name: name.into(),
            attrs,
        }))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Append text to the last child if it is a text node, or create one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.alloc(Node::new(NodeData::Text(text.to_string())));
        self.append(parent, text_node);
    }

    /// Unlink the text children of `id`, keeping element children in order.
    ///
    /// Only the loader uses this, to drop indentation before anyone walks the
    /// tree.
    pub(crate) fn clear_text(&mut self, id: NodeId) {
        let elements: Vec<NodeId> = self
            .children(id)
            .filter(|&child| !matches!(self.get(child).map(|n| &n.data), Some(NodeData::Text(_))))
            .collect();

        if let Some(node) = self.get_mut(id) {
            node.first_child = NodeId::NONE;
            node.last_child = NodeId::NONE;
        }
        for child in elements {
            if let Some(node) = self.get_mut(child) {
                node.next_sibling = NodeId::NONE;
            }
            self.append(id, child);
        }
    }

    /// Total number of nodes, including the document root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no document element has been appended.
    pub fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Iterate over children of a node in document order.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children {
            doc: self,
            current: first,
        }
    }

    /// Iterate over the element children of `parent` named `name`.
    pub fn child_elements<'a>(
        &'a self,
        parent: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |&id| self.element_name(id) == Some(name))
    }

    /// First element child named `name`.
    pub fn first_child_element(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements(parent, name).next()
    }

    /// Follow a path of element names from `start`, taking the first match at
    /// each step (`["body", "text"]` finds `start/body[1]/text[1]`).
    pub fn find_path(&self, start: NodeId, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(start, |id, name| self.first_child_element(id, name))
    }

    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Get an attribute value by (lowercase) name.
    pub fn attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name == attr_name)
            .map(|a| a.value.as_str())
    }

    /// Append an attribute to an element.
    ///
    /// Returns `false`, leaving the element untouched, when the attribute is
    /// already present or `id` is not an element.
    pub fn add_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        match &mut node.data {
            NodeData::Element { attrs, .. } if !attrs.iter().any(|a| a.name == name) => {
                attrs.push(Attribute::new(name, value));
                true
            }
            _ => false,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Concatenated text of the direct text children of `id`.
    pub fn text(&self, id: NodeId) -> String {
        self.children(id)
            .filter_map(|child| match &self.get(child)?.data {
                NodeData::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Iterator over children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .doc
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}
