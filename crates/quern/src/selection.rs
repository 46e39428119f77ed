//! Selection and chaining engine
//!
//! `Quern` owns the document, the timer clock, and the event listener
//! registry. Resolving a selector produces a `Selection`: either a
//! `NodeSet` of members in document order, or the distinguished `Empty`
//! value on which every chain method is a no-op and every terminal
//! method yields `None`.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use quern_dom::{Document, NodeId, SelectorList};
use quern_runtime::Scheduler;

use crate::Error;
use crate::events::EventRegistry;

pub(crate) struct Shared {
    pub(crate) doc: RefCell<Document>,
    pub(crate) clock: Scheduler,
    pub(crate) events: RefCell<EventRegistry>,
}

/// Library entry point
#[derive(Clone)]
pub struct Quern {
    pub(crate) shared: Rc<Shared>,
}

/// What a selection is resolved from: selector text or an existing node
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Selector(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

impl Quern {
    /// Create an instance over an empty document
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    /// Create an instance over a parsed markup string
    pub fn from_html(markup: &str) -> Self {
        Self::from_document(Document::from_html(markup))
    }

    /// Create an instance over an existing document
    pub fn from_document(doc: Document) -> Self {
        Self {
            shared: Rc::new(Shared {
                doc: RefCell::new(doc),
                clock: Scheduler::new(),
                events: RefCell::new(EventRegistry::default()),
            }),
        }
    }

    /// Borrow the document
    pub fn document(&self) -> Ref<'_, Document> {
        self.shared.doc.borrow()
    }

    /// Borrow the document mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.shared.doc.borrow_mut()
    }

    /// The timer clock driving fades and delayed show/hide
    pub fn clock(&self) -> &Scheduler {
        &self.shared.clock
    }

    /// Advance the virtual clock, running due timer callbacks
    pub fn advance(&self, delta_ms: u64) {
        self.shared.clock.advance(delta_ms);
    }

    /// Create a detached element in the document
    pub fn create_element(&self, tag: &str) -> Result<NodeId, Error> {
        if tag.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "element type is required".to_string(),
            ));
        }
        Ok(self.shared.doc.borrow_mut().create_element(tag))
    }

    /// Resolve a target into a selection.
    ///
    /// A selector string is queried against the whole document; a node
    /// handle becomes a one-member set verbatim, with no query.
    pub fn select<'a>(&self, target: impl Into<Target<'a>>) -> Result<Selection, Error> {
        match target.into() {
            Target::Node(id) => Ok(self.wrap(vec![id])),
            Target::Selector(text) => {
                let list = parse_selector(text)?;
                let doc = self.shared.doc.borrow();
                let members = doc.query_selector_all(doc.root(), &list);
                drop(doc);
                tracing::debug!(selector = text, count = members.len(), "resolved");
                if members.is_empty() {
                    Ok(Selection::Empty)
                } else {
                    Ok(self.wrap(members))
                }
            }
        }
    }

    /// Resolve a selector within each element matched by a context
    /// selector.
    ///
    /// Context elements are visited in document order and the inner
    /// matches are appended per context, so a node reachable under two
    /// context elements appears twice.
    pub fn select_in(&self, selector: &str, context: &str) -> Result<Selection, Error> {
        let inner = parse_selector(selector)?;
        let outer = parse_selector(context)?;
        let doc = self.shared.doc.borrow();
        let mut members = Vec::new();
        for ctx in doc.query_selector_all(doc.root(), &outer) {
            members.extend(doc.query_selector_all(ctx, &inner));
        }
        drop(doc);
        tracing::debug!(selector, context, count = members.len(), "resolved in context");
        if members.is_empty() {
            Ok(Selection::Empty)
        } else {
            Ok(self.wrap(members))
        }
    }

    fn wrap(&self, members: Vec<NodeId>) -> Selection {
        Selection::Matched(NodeSet {
            shared: self.shared.clone(),
            members: members.into(),
        })
    }
}

impl Default for Quern {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_selector(text: &str) -> Result<SelectorList, Error> {
    SelectorList::parse(text).map_err(|err| {
        tracing::debug!(selector = text, %err, "selector rejected");
        Error::InvalidSelector
    })
}

/// An ordered working set of nodes
#[derive(Clone)]
pub struct NodeSet {
    pub(crate) shared: Rc<Shared>,
    /// Members in resolution order; never mutated in place
    pub(crate) members: Rc<[NodeId]>,
}

// Shared document state carries no useful Debug output; render the
// member list only.
impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSet")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

/// A resolved selection: a working set, or the distinguished value for
/// "the selector matched nothing"
#[derive(Clone)]
pub enum Selection {
    Matched(NodeSet),
    Empty,
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Matched(set) => f.debug_tuple("Matched").field(set).finish(),
            Selection::Empty => f.write_str("Empty"),
        }
    }
}

impl Selection {
    /// The working set, if the selector matched anything
    pub(crate) fn nodes(&self) -> Option<&NodeSet> {
        match self {
            Selection::Matched(set) => Some(set),
            Selection::Empty => None,
        }
    }

    /// Members in stored order ([] for the empty selection)
    pub fn members(&self) -> &[NodeId] {
        self.nodes().map_or(&[], |set| &set.members)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// Whether this is the empty selection
    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }

    /// The designated (first) member terminal methods read from
    pub fn first(&self) -> Option<NodeId> {
        self.members().first().copied()
    }

    /// Re-wrap a single member by index; out of range yields the empty
    /// selection
    pub fn eq(&self, index: usize) -> Selection {
        match self.nodes() {
            Some(set) => match set.members.get(index) {
                Some(&id) => Selection::Matched(NodeSet {
                    shared: set.shared.clone(),
                    members: vec![id].into(),
                }),
                None => Selection::Empty,
            },
            None => Selection::Empty,
        }
    }

    /// The iteration protocol: invoke `f` once per member, in stored
    /// order, synchronously, with the current element passed explicitly.
    /// Returns the selection for chaining.
    pub fn each(&self, mut f: impl FnMut(&mut Document, NodeId)) -> Selection {
        if let Some(set) = self.nodes() {
            let mut doc = set.shared.doc.borrow_mut();
            for &id in set.members.iter() {
                f(&mut doc, id);
            }
        }
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_document_order() {
        let q = Quern::from_html("<p>a</p><div><p>b</p></div><p>c</p>");
        let sel = q.select("p").unwrap();
        assert_eq!(sel.len(), 3);
        let texts: Vec<String> = sel
            .members()
            .iter()
            .map(|&id| q.document().inner_html(id))
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_select_no_match_is_distinguished_empty() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select(".missing").unwrap();
        assert!(matches!(sel, Selection::Empty));
        assert!(sel.is_empty());
        assert_eq!(sel.first(), None);
    }

    #[test]
    fn test_select_node_wraps_verbatim() {
        let q = Quern::from_html("<div></div>");
        let id = q.create_element("span").unwrap();
        let sel = q.select(id).unwrap();
        assert_eq!(sel.members(), &[id]);
    }

    #[test]
    fn test_empty_selector_is_invalid() {
        let q = Quern::new();
        assert_eq!(q.select("").unwrap_err(), Error::InvalidSelector);
        assert_eq!(q.select("  ").unwrap_err(), Error::InvalidSelector);
        assert_eq!(q.select("p >> q").unwrap_err(), Error::InvalidSelector);
    }

    #[test]
    fn test_select_in_orders_per_context() {
        let q = Quern::from_html(
            "<section><div>1</div></section><section><div>2</div></section>",
        );
        let sel = q.select_in("div", "section").unwrap();
        assert_eq!(sel.len(), 2);
        let texts: Vec<String> = sel
            .members()
            .iter()
            .map(|&id| q.document().inner_html(id))
            .collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_select_in_preserves_duplicates_across_nested_contexts() {
        // The inner div sits under both matching contexts, so it is
        // collected once per context.
        let q = Quern::from_html("<section><section><div>x</div></section></section>");
        let sel = q.select_in("div", "section").unwrap();
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.members()[0], sel.members()[1]);
    }

    #[test]
    fn test_select_in_empty_context_is_empty() {
        let q = Quern::from_html("<div>1</div>");
        let sel = q.select_in("div", "section").unwrap();
        assert!(matches!(sel, Selection::Empty));
    }

    #[test]
    fn test_each_visits_in_order() {
        let q = Quern::from_html("<i>1</i><i>2</i><i>3</i>");
        let sel = q.select("i").unwrap();
        let mut seen = Vec::new();
        let chained = sel.each(|doc, id| seen.push(doc.inner_html(id)));
        assert_eq!(seen, vec!["1", "2", "3"]);
        assert_eq!(chained.members(), sel.members());
    }

    #[test]
    fn test_selection_debug_renders() {
        let q = Quern::from_html("<i></i>");
        let sel = q.select("i").unwrap();
        assert!(format!("{sel:?}").starts_with("Matched(NodeSet"));
        assert_eq!(format!("{:?}", Selection::Empty), "Empty");
        // Debug is what lets Result<Selection, _> assertions unwrap.
        let err = q.select("").unwrap_err();
        assert_eq!(err, Error::InvalidSelector);
    }

    #[test]
    fn test_eq_rewraps_single_member() {
        let q = Quern::from_html("<i>1</i><i>2</i>");
        let sel = q.select("i").unwrap();
        assert_eq!(sel.eq(1).len(), 1);
        assert_eq!(sel.eq(1).first(), Some(sel.members()[1]));
        assert!(sel.eq(5).is_empty());
    }
}
