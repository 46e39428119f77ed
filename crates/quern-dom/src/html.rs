//! HTML fragment parsing and serialization
//!
//! A small forgiving parser in the innerHTML spirit: unknown constructs
//! are skipped, mismatched end tags are ignored, unclosed elements are
//! closed at end of input. Not an HTML5 conformance parser.

use crate::{Document, NodeId};

/// Insertion point for `insert_adjacent_html`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the element itself
    BeforeBegin,
    /// Before the element's first child
    AfterBegin,
    /// After the element's last child
    BeforeEnd,
    /// After the element itself
    AfterEnd,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

struct TagToken {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
}

impl Document {
    /// Parse `markup` into this document's arena; returns the top-level
    /// nodes, detached and in source order
    pub fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let mut roots = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut rest = markup;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("<!--") {
                let (content, tail) = match after.split_once("-->") {
                    Some((c, t)) => (c, t),
                    None => (after, ""),
                };
                let node = self.create_comment(content);
                self.attach(&stack, &mut roots, node);
                rest = tail;
            } else if let Some(after) = rest.strip_prefix("<!") {
                // Doctype, CDATA, and other declarations carry no tree
                // content here; skip to the closing '>'.
                rest = match after.split_once('>') {
                    Some((_, tail)) => tail,
                    None => "",
                };
            } else if let Some(after) = rest.strip_prefix("</") {
                let (inside, tail) = match after.split_once('>') {
                    Some((i, t)) => (i, t),
                    None => (after, ""),
                };
                let name = inside.trim().to_ascii_lowercase();
                // Pop to the matching open element; ignore strays.
                if let Some(pos) = stack
                    .iter()
                    .rposition(|&id| self.element(id).is_some_and(|e| e.tag == name))
                {
                    stack.truncate(pos);
                }
                rest = tail;
            } else if starts_tag(rest) {
                let (token, tail) = parse_tag(rest);
                let node = self.create_element(&token.name);
                for (name, value) in &token.attrs {
                    self.set_attr(node, name, value);
                }
                self.attach(&stack, &mut roots, node);
                if !token.self_closing && !is_void(&token.name) {
                    stack.push(node);
                }
                rest = tail;
            } else {
                let (text, tail) = take_text(rest);
                if !text.is_empty() {
                    let node = self.create_text(&decode_entities(text));
                    self.attach(&stack, &mut roots, node);
                }
                rest = tail;
            }
        }

        tracing::trace!(roots = roots.len(), "parsed fragment");
        roots
    }

    fn attach(&mut self, stack: &[NodeId], roots: &mut Vec<NodeId>, node: NodeId) {
        match stack.last() {
            Some(&parent) => self.append_child(parent, node),
            None => roots.push(node),
        }
    }

    /// Parse a whole markup string into a fresh document
    pub fn from_html(markup: &str) -> Self {
        let mut doc = Self::new();
        let roots = doc.parse_fragment(markup);
        for node in roots {
            doc.append_child(doc.root(), node);
        }
        doc
    }

    /// Serialized markup of the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.serialize_node(child, &mut out);
        }
        out
    }

    /// Serialized markup of the node itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    /// Replace the node's children with parsed markup
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) {
        let old: Vec<NodeId> = self.children(id).collect();
        for child in old {
            self.detach(child);
        }
        let roots = self.parse_fragment(markup);
        for node in roots {
            self.append_child(id, node);
        }
    }

    /// Parse markup and insert it at the named position relative to `id`
    pub fn insert_adjacent_html(&mut self, id: NodeId, position: InsertPosition, markup: &str) {
        let roots = self.parse_fragment(markup);
        self.insert_adjacent_nodes(id, position, &roots);
    }

    /// Insert existing nodes at the named position relative to `id`
    pub fn insert_adjacent_nodes(&mut self, id: NodeId, position: InsertPosition, nodes: &[NodeId]) {
        match position {
            InsertPosition::BeforeBegin => {
                let parent = self.parent(id);
                for &node in nodes {
                    self.insert_before(parent, node, id);
                }
            }
            InsertPosition::AfterBegin => {
                let reference = self.first_child(id);
                for &node in nodes {
                    self.insert_before(id, node, reference);
                }
            }
            InsertPosition::BeforeEnd => {
                for &node in nodes {
                    self.append_child(id, node);
                }
            }
            InsertPosition::AfterEnd => {
                let parent = self.parent(id);
                let reference = self.next_sibling(id);
                for &node in nodes {
                    self.insert_before(parent, node, reference);
                }
            }
        }
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.data {
            crate::NodeData::Document => {
                for child in self.children(id) {
                    self.serialize_node(child, out);
                }
            }
            crate::NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
                out.push('>');
                if !is_void(&el.tag) {
                    for child in self.children(id) {
                        self.serialize_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(&el.tag);
                    out.push('>');
                }
            }
            crate::NodeData::Text(text) => out.push_str(&escape_text(text)),
            crate::NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

/// Whether the input starts an open tag (`<` followed by a letter)
fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Consume text up to the next markup-looking `<`
fn take_text(rest: &str) -> (&str, &str) {
    let mut search_from = 0;
    loop {
        match rest[search_from..].find('<') {
            None => return (rest, ""),
            Some(off) => {
                let at = search_from + off;
                let tail = &rest[at..];
                if starts_tag(tail) || tail.starts_with("</") || tail.starts_with("<!") {
                    return (&rest[..at], tail);
                }
                // Literal '<' in text; keep scanning.
                search_from = at + 1;
            }
        }
    }
}

fn parse_tag(rest: &str) -> (TagToken, &str) {
    let mut chars = rest.char_indices().peekable();
    chars.next(); // consume '<'

    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c.to_ascii_lowercase());
            chars.next();
        } else {
            break;
        }
    }

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;
    let mut end = rest.len();

    'outer: loop {
        // Skip whitespace and lone slashes.
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else if c == '/' {
                chars.next();
                if chars.peek().is_some_and(|&(_, c2)| c2 == '>') {
                    self_closing = true;
                }
            } else if c == '>' {
                chars.next();
                end = i + 1;
                break 'outer;
            } else {
                break;
            }
        }
        if chars.peek().is_none() {
            break;
        }

        // Attribute name.
        let mut attr_name = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' || c == '>' || c == '/' {
                break;
            }
            attr_name.push(c.to_ascii_lowercase());
            chars.next();
        }
        if attr_name.is_empty() {
            // Unparseable garbage; bail at the next '>'.
            while let Some((i, c)) = chars.next() {
                if c == '>' {
                    end = i + 1;
                    break 'outer;
                }
            }
            break;
        }

        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let mut value = String::new();
        if chars.peek().is_some_and(|&(_, c)| c == '=') {
            chars.next();
            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }
            match chars.peek() {
                Some(&(_, quote)) if quote == '"' || quote == '\'' => {
                    chars.next();
                    for (_, c) in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        value.push(c);
                    }
                }
                _ => {
                    while let Some(&(_, c)) = chars.peek() {
                        if c.is_whitespace() || c == '>' {
                            break;
                        }
                        value.push(c);
                        chars.next();
                    }
                }
            }
        }
        attrs.push((attr_name, decode_entities(&value)));
    }

    // If we ran out of input, everything was consumed.
    if chars.peek().is_none() && !rest[..end.min(rest.len())].ends_with('>') {
        end = rest.len();
    }

    (
        TagToken {
            name,
            attrs,
            self_closing,
        },
        &rest[end..],
    )
}

/// Decode the basic named entities plus numeric character references
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(semi) = rest.find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| {
                    if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        num.parse().ok()
                    }
                })
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
