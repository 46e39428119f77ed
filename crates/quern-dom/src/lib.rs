//! Quern DOM - in-memory document surface
//!
//! Arena-based node tree with the capability surface the Quern library
//! builds on: selector queries, attribute/style/class accessors, HTML
//! fragment parsing and serialization, and host-supplied geometry.

mod document;
mod geometry;
mod html;
mod node;
mod selector;

pub use document::Document;
pub use geometry::ElementGeometry;
pub use html::InsertPosition;
pub use node::{Attr, ElementData, Node, NodeData};
pub use selector::{SelectorError, SelectorList};

/// Node identifier (index into the document arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Document root ID
    pub const ROOT: NodeId = NodeId(0);

    /// Check that this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
