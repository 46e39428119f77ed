//! Document - arena-backed node tree
//!
//! All nodes live in one `Vec`; structural links are `NodeId` indices.
//! Detached nodes stay in the arena until the document is dropped.

use crate::{ElementData, ElementGeometry, Node, NodeData, NodeId, SelectorList, selector};

/// An in-memory document
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    touch_enabled: bool,
}

impl Document {
    /// Create a new document containing only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            touch_enabled: false,
        }
    }

    /// Number of nodes ever allocated (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document root
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether the host environment reports touch input support
    pub fn supports_touch(&self) -> bool {
        self.touch_enabled
    }

    /// Host capability toggle for touch input
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_valid() {
            self.nodes.get_mut(id.index())
        } else {
            None
        }
    }

    /// Get element data if the node is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    /// Get mutable element data
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.node_mut(id).and_then(Node::as_element_mut)
    }

    // ----- node construction -----

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(Node::new(NodeData::Element(ElementData::new(tag))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push_node(Node::new(NodeData::Text(content.to_string())))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push_node(Node::new(NodeData::Comment(content.to_string())))
    }

    // ----- structural links -----

    /// Parent of a node (NONE if detached, root, or invalid)
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NONE, |n| n.parent)
    }

    /// First child of a node
    pub fn first_child(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NONE, |n| n.first_child)
    }

    /// Last child of a node
    pub fn last_child(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NONE, |n| n.last_child)
    }

    /// Next sibling of a node
    pub fn next_sibling(&self, id: NodeId) -> NodeId {
        self.node(id).map_or(NodeId::NONE, |n| n.next_sibling)
    }

    /// Whether `ancestor` is on the parent chain of `node`
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.parent(node);
        while cur.is_valid() {
            if cur == ancestor {
                return true;
            }
            cur = self.parent(cur);
        }
        false
    }

    /// Append a child as the last child of `parent`.
    ///
    /// Inserting a node into itself or into its own subtree is refused;
    /// it would sever the subtree into a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none()
            || self.node(child).is_none()
            || parent == child
            || self.is_ancestor(child, parent)
        {
            return;
        }
        self.detach(child);
        let prev = self.last_child(parent);
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = NodeId::NONE;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Insert `child` under `parent` immediately before `reference`.
    ///
    /// A NONE (or foreign) reference appends instead, matching the
    /// forgiving insertBefore(parent, node, null) convention.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if !reference.is_valid() || self.parent(reference) != parent {
            self.append_child(parent, child);
            return;
        }
        if self.node(parent).is_none()
            || self.node(child).is_none()
            || parent == child
            || self.is_ancestor(child, parent)
        {
            return;
        }
        self.detach(child);
        let prev = self.node(reference).map_or(NodeId::NONE, |n| n.prev_sibling);
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        self.nodes[reference.index()].prev_sibling = child;
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
    }

    /// Unlink a node from its parent and siblings (children are kept)
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Deep-clone a subtree; the copy is detached
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let Some(node) = self.node(id) else {
            return NodeId::NONE;
        };
        let data = node.data.clone();
        let copy = self.push_node(Node::new(data));
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            let child_copy = self.clone_subtree(child);
            if child_copy.is_valid() {
                self.append_child(copy, child_copy);
            }
        }
        copy
    }

    // ----- traversal -----

    /// Iterate direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            cur: self.first_child(id),
        }
    }

    /// Iterate the subtree below `root` in document (preorder) order,
    /// excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root,
            cur: self.first_child(root),
        }
    }

    // ----- element accessors -----

    /// Attribute value on an element node
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    /// Set an attribute; no-op on non-element nodes
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_attr(name, value);
        }
    }

    /// Remove an attribute; returns true if it was present
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.remove_attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Inline style property value
    pub fn style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style(prop))
    }

    /// Set an inline style property; no-op on non-element nodes
    pub fn set_style(&mut self, id: NodeId, prop: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_style(prop, value);
        }
    }

    /// The `class` attribute ("" for non-elements)
    pub fn class_name(&self, id: NodeId) -> &str {
        self.element(id).map_or("", ElementData::class_name)
    }

    /// Geometry of an element (default zeros if unset or not an element)
    pub fn geometry(&self, id: NodeId) -> ElementGeometry {
        self.element(id).map_or_else(ElementGeometry::default, |e| e.geometry)
    }

    /// Assign host geometry to an element
    pub fn set_geometry(&mut self, id: NodeId, geometry: ElementGeometry) {
        if let Some(e) = self.element_mut(id) {
            e.geometry = geometry;
        }
    }

    // ----- queries -----

    /// All elements below `root` (excluded) matching the selector list,
    /// in document order
    pub fn query_selector_all(&self, root: NodeId, list: &SelectorList) -> Vec<NodeId> {
        let matches: Vec<NodeId> = self
            .descendants(root)
            .filter(|&id| selector::matches_list(self, id, list))
            .collect();
        tracing::trace!(?root, count = matches.len(), "selector query");
        matches
    }

    /// Whether one element matches the selector list
    pub fn matches(&self, id: NodeId, list: &SelectorList) -> bool {
        selector::matches_list(self, id, list)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    doc: &'a Document,
    cur: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.cur.is_valid() {
            return None;
        }
        let id = self.cur;
        self.cur = self.doc.next_sibling(id);
        Some(id)
    }
}

/// Preorder iterator over a subtree, root excluded
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    cur: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.cur.is_valid() {
            return None;
        }
        let id = self.cur;
        // Preorder successor: first child, else next sibling of the
        // nearest ancestor still inside the subtree.
        let mut next = self.doc.first_child(id);
        if !next.is_valid() {
            let mut n = id;
            loop {
                if n == self.root {
                    next = NodeId::NONE;
                    break;
                }
                let sib = self.doc.next_sibling(n);
                if sib.is_valid() {
                    next = sib;
                    break;
                }
                n = self.doc.parent(n);
                if !n.is_valid() {
                    next = NodeId::NONE;
                    break;
                }
            }
        }
        self.cur = next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(doc: &Document, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| doc.element(id).map(|e| e.tag.clone()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_append_order() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(doc.root(), a);
        doc.append_child(doc.root(), b);
        let kids: Vec<NodeId> = doc.children(doc.root()).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn test_insert_before() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        doc.append_child(doc.root(), a);
        doc.append_child(doc.root(), c);
        doc.insert_before(doc.root(), b, c);
        let kids: Vec<NodeId> = doc.children(doc.root()).collect();
        assert_eq!(tags(&doc, &kids), vec!["a", "b", "c"]);
        assert_eq!(doc.first_child(doc.root()), a);
        assert_eq!(doc.last_child(doc.root()), c);
    }

    #[test]
    fn test_insert_before_none_appends() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(doc.root(), a);
        doc.insert_before(doc.root(), b, NodeId::NONE);
        let kids: Vec<NodeId> = doc.children(doc.root()).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn test_detach_middle() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        for id in [a, b, c] {
            doc.append_child(doc.root(), id);
        }
        doc.detach(b);
        let kids: Vec<NodeId> = doc.children(doc.root()).collect();
        assert_eq!(kids, vec![a, c]);
        assert!(!doc.parent(b).is_valid());
    }

    #[test]
    fn test_descendants_preorder() {
        let mut doc = Document::new();
        let outer = doc.create_element("section");
        let inner = doc.create_element("div");
        let span = doc.create_element("span");
        let tail = doc.create_element("p");
        doc.append_child(doc.root(), outer);
        doc.append_child(outer, inner);
        doc.append_child(inner, span);
        doc.append_child(doc.root(), tail);
        let order: Vec<NodeId> = doc.descendants(doc.root()).collect();
        assert_eq!(order, vec![outer, inner, span, tail]);
        // Scoped traversal stays inside the subtree.
        let scoped: Vec<NodeId> = doc.descendants(outer).collect();
        assert_eq!(scoped, vec![inner, span]);
    }

    #[test]
    fn test_clone_subtree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "id", "orig");
        let text = doc.create_text("hello");
        doc.append_child(div, text);
        doc.append_child(doc.root(), div);

        let copy = doc.clone_subtree(div);
        assert_ne!(copy, div);
        assert!(!doc.parent(copy).is_valid());
        assert_eq!(doc.attr(copy, "id"), Some("orig"));
        let copy_kids: Vec<NodeId> = doc.children(copy).collect();
        assert_eq!(copy_kids.len(), 1);
        assert_eq!(doc.node(copy_kids[0]).unwrap().as_text(), Some("hello"));
    }

    #[test]
    fn test_append_refuses_cyclic_insertion() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(doc.root(), outer);
        doc.append_child(outer, inner);
        // Moving an ancestor under its own descendant is refused.
        doc.append_child(inner, outer);
        assert_eq!(doc.parent(outer), doc.root());
        assert_eq!(doc.parent(inner), outer);
        doc.insert_before(inner, outer, NodeId::NONE);
        assert_eq!(doc.parent(outer), doc.root());
        // The subtree still serializes.
        assert_eq!(doc.outer_html(outer), "<div><span></span></div>");
    }

    #[test]
    fn test_reappend_moves_node() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(doc.root(), a);
        doc.append_child(doc.root(), b);
        doc.append_child(b, a);
        let kids: Vec<NodeId> = doc.children(doc.root()).collect();
        assert_eq!(kids, vec![b]);
        assert_eq!(doc.parent(a), b);
    }
}
