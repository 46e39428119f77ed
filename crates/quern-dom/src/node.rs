//! DOM node - compact representation
//!
//! Sibling/child links are `NodeId` indices into the document arena
//! rather than pointers, so nodes stay `'static` and cheap to copy around.

use crate::{ElementGeometry, NodeId};

/// A single node in the document arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, stored lowercase
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attr>,
    /// Inline style declarations in insertion order
    pub style: Vec<(String, String)>,
    /// Host-supplied layout geometry
    pub geometry: ElementGeometry,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
            geometry: ElementGeometry::default(),
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value.
    ///
    /// Writing `style` also reparses the inline style declarations, so
    /// `style(..)` reads stay coherent with the attribute text.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("style") {
            self.style = parse_style_text(value);
        }
        self.set_raw_attr(name, value);
    }

    fn set_raw_attr(&mut self, name: &str, value: &str) {
        for attr in &mut self.attrs {
            if attr.name == name {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attr {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute; returns true if it was present
    pub fn remove_attr(&mut self, name: &str) -> bool {
        if name.eq_ignore_ascii_case("style") {
            self.style.clear();
        }
        let before = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        self.attrs.len() != before
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Get an inline style property value
    pub fn style(&self, prop: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property and re-render the `style` attribute
    pub fn set_style(&mut self, prop: &str, value: &str) {
        let mut replaced = false;
        for decl in &mut self.style {
            if decl.0 == prop {
                decl.1 = value.to_string();
                replaced = true;
                break;
            }
        }
        if !replaced {
            self.style.push((prop.to_string(), value.to_string()));
        }
        let text = self.style_text();
        self.set_raw_attr("style", &text);
    }

    /// The inline style declarations rendered as attribute text
    pub fn style_text(&self) -> String {
        let decls: Vec<String> = self
            .style
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect();
        decls.join("; ")
    }

    /// The `class` attribute as a whitespace-separated string
    pub fn class_name(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Replace the `class` attribute wholesale
    pub fn set_class_name(&mut self, value: &str) {
        self.set_attr("class", value);
    }

    /// Iterate class names
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name().split_whitespace()
    }

    /// The `id` attribute, if any
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }
}

/// A single attribute
#[derive(Debug, Clone)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

fn parse_style_text(text: &str) -> Vec<(String, String)> {
    let mut decls = Vec::new();
    for part in text.split(';') {
        let Some((prop, value)) = part.split_once(':') else {
            continue;
        };
        let prop = prop.trim();
        let value = value.trim();
        if !prop.is_empty() && !value.is_empty() {
            decls.push((prop.to_string(), value.to_string()));
        }
    }
    decls
}
