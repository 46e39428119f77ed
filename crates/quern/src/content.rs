//! Content operations
//!
//! Insertions accept one of three shapes, decided once at the call
//! boundary: literal markup (starts with `<`, ends with `>`, length at
//! least 3), a selector resolved against the whole document, or an
//! existing node. Markup is parsed fresh per member; resolved and given
//! nodes are moved, so with several members they end up under the last.

use quern_dom::{InsertPosition, NodeId, SelectorList};

use crate::{Error, Selection};

/// Content accepted by the insertion operations
#[derive(Debug, Clone)]
pub enum Content {
    /// Literal markup to parse
    Markup(String),
    /// Selector text resolved against the document
    Selector(String),
    /// An existing node, moved into place
    Node(NodeId),
}

impl Content {
    /// Classify a string: markup if it is `<`...`>` of length >= 3,
    /// otherwise a selector
    pub fn from_text(text: &str) -> Self {
        if is_markup(text) {
            Content::Markup(text.to_string())
        } else {
            Content::Selector(text.to_string())
        }
    }
}

fn is_markup(text: &str) -> bool {
    text.len() >= 3 && text.starts_with('<') && text.ends_with('>')
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::from_text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::from_text(&text)
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Content::Node(node)
    }
}

impl Selection {
    /// Serialized contents of the first member
    pub fn html(&self) -> Option<String> {
        let set = self.nodes()?;
        let id = self.first()?;
        Some(set.shared.doc.borrow().inner_html(id))
    }

    /// Replace the contents of every member with parsed markup
    pub fn set_html(&self, markup: &str) -> Selection {
        self.each(|doc, id| doc.set_inner_html(id, markup))
    }

    /// Insert content as the last child of every member
    pub fn append(&self, content: impl Into<Content>) -> Result<Selection, Error> {
        self.insert_content(InsertPosition::BeforeEnd, content.into())
    }

    /// Insert content as the first child of every member
    pub fn prepend(&self, content: impl Into<Content>) -> Result<Selection, Error> {
        self.insert_content(InsertPosition::AfterBegin, content.into())
    }

    /// Insert content immediately before every member
    pub fn before(&self, content: impl Into<Content>) -> Result<Selection, Error> {
        self.insert_content(InsertPosition::BeforeBegin, content.into())
    }

    /// Insert content immediately after every member
    pub fn after(&self, content: impl Into<Content>) -> Result<Selection, Error> {
        self.insert_content(InsertPosition::AfterEnd, content.into())
    }

    fn insert_content(&self, position: InsertPosition, content: Content) -> Result<Selection, Error> {
        let Some(set) = self.nodes() else {
            return Ok(self.clone());
        };
        let mut doc = set.shared.doc.borrow_mut();
        match content {
            Content::Markup(markup) => {
                for &id in set.members.iter() {
                    doc.insert_adjacent_html(id, position, &markup);
                }
            }
            Content::Selector(text) => {
                let list = SelectorList::parse(&text).map_err(|_| Error::InvalidSelector)?;
                let root = doc.root();
                let matches = doc.query_selector_all(root, &list);
                for &id in set.members.iter() {
                    doc.insert_adjacent_nodes(id, position, &matches);
                }
            }
            Content::Node(node) => {
                for &id in set.members.iter() {
                    doc.insert_adjacent_nodes(id, position, &[node]);
                }
            }
        }
        Ok(self.clone())
    }

    /// Detach every member from the document
    pub fn remove(&self) -> Selection {
        self.each(|doc, id| doc.detach(id))
    }

    /// Detach document-wide selector matches that are direct children of
    /// a member
    pub fn remove_matching(&self, selector: &str) -> Result<Selection, Error> {
        let Some(set) = self.nodes() else {
            return Ok(self.clone());
        };
        let list = SelectorList::parse(selector).map_err(|_| Error::InvalidSelector)?;
        let mut doc = set.shared.doc.borrow_mut();
        let root = doc.root();
        let matches = doc.query_selector_all(root, &list);
        for &id in set.members.iter() {
            for &hit in &matches {
                if doc.parent(hit) == id {
                    doc.detach(hit);
                }
            }
        }
        drop(doc);
        Ok(self.clone())
    }

    /// Replace every member with parsed markup
    pub fn replace_with(&self, markup: &str) -> Selection {
        self.each(|doc, id| {
            doc.insert_adjacent_html(id, InsertPosition::BeforeBegin, markup);
            doc.detach(id);
        })
    }

    /// Wrap every member in the given structure.
    ///
    /// The structure must be markup; an unclosed wrapper swallows the
    /// member when reparsed, which is exactly how the wrap works.
    pub fn wrap(&self, structure: &str) -> Result<Selection, Error> {
        if !is_markup(structure) {
            return Err(Error::InvalidArgument(
                "wrap structure must be markup".to_string(),
            ));
        }
        Ok(self.each(|doc, id| {
            let combined = format!("{structure}{}", doc.outer_html(id));
            doc.insert_adjacent_html(id, InsertPosition::BeforeBegin, &combined);
            doc.detach(id);
        }))
    }

    /// Wrap the contents of every member in the given structure
    pub fn wrap_inner(&self, structure: &str) -> Result<Selection, Error> {
        if !is_markup(structure) {
            return Err(Error::InvalidArgument(
                "wrap_inner structure must be markup".to_string(),
            ));
        }
        Ok(self.each(|doc, id| {
            let combined = format!("{structure}{}", doc.inner_html(id));
            doc.set_inner_html(id, &combined);
        }))
    }

    /// Deep-clone the first member; the copy is detached
    pub fn clone_first(&self) -> Option<NodeId> {
        let set = self.nodes()?;
        let id = self.first()?;
        Some(set.shared.doc.borrow_mut().clone_subtree(id))
    }
}
