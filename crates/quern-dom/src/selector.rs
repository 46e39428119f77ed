//! CSS-subset selector engine
//!
//! Selector lists (`a, b`), compound simple selectors (`tag#id.cls`),
//! the universal selector, and the descendant combinator. Matching is
//! right-to-left with greedy ancestor search, which is exact for
//! descendant-only combinators.

use crate::{Document, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unsupported token {0:?} in selector")]
    UnsupportedToken(String),
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

/// One complex selector: compounds joined by descendant combinators,
/// subject last
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
}

/// One compound simple selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl SelectorList {
    /// Parse selector text
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut selectors = Vec::new();
        for part in input.split(',') {
            if part.trim().is_empty() {
                return Err(SelectorError::Empty);
            }
            let mut compounds = Vec::new();
            for word in part.split_whitespace() {
                compounds.push(parse_compound(word)?);
            }
            selectors.push(ComplexSelector { compounds });
        }
        Ok(Self { selectors })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(word: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = word.chars().peekable();

    // Optional leading tag name or universal selector.
    if chars.peek() == Some(&'*') {
        chars.next();
    } else if chars.peek().is_some_and(|&c| is_name_char(c)) {
        let mut tag = String::new();
        while let Some(c) = chars.next_if(|&c| is_name_char(c)) {
            tag.push(c);
        }
        compound.tag = Some(tag.to_ascii_lowercase());
    }

    while let Some(marker) = chars.next() {
        let mut name = String::new();
        while let Some(c) = chars.next_if(|&c| is_name_char(c)) {
            name.push(c);
        }
        match marker {
            '#' if !name.is_empty() => compound.id = Some(name),
            '.' if !name.is_empty() => compound.classes.push(name),
            _ => return Err(SelectorError::UnsupportedToken(word.to_string())),
        }
    }

    if compound == Compound::default() && !word.starts_with('*') {
        return Err(SelectorError::UnsupportedToken(word.to_string()));
    }
    Ok(compound)
}

/// Whether `id` (an element) matches any selector in the list
pub(crate) fn matches_list(doc: &Document, id: NodeId, list: &SelectorList) -> bool {
    if doc.element(id).is_none() {
        return false;
    }
    list.selectors.iter().any(|sel| matches_complex(doc, id, sel))
}

fn matches_complex(doc: &Document, id: NodeId, sel: &ComplexSelector) -> bool {
    let Some(subject) = sel.compounds.last() else {
        return false;
    };
    if !matches_compound(doc, id, subject) {
        return false;
    }
    // Remaining compounds must match ancestors, nearest-first.
    let mut idx = sel.compounds.len() - 1;
    let mut node = doc.parent(id);
    while idx > 0 {
        let needle = &sel.compounds[idx - 1];
        loop {
            if !node.is_valid() {
                return false;
            }
            let found = matches_compound(doc, node, needle);
            node = doc.parent(node);
            if found {
                idx -= 1;
                break;
            }
        }
    }
    true
}

fn matches_compound(doc: &Document, id: NodeId, compound: &Compound) -> bool {
    let Some(el) = doc.element(id) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if !el.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(want) = &compound.id {
        if el.id() != Some(want.as_str()) {
            return false;
        }
    }
    compound
        .classes
        .iter()
        .all(|c| el.classes().any(|have| have == c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn doc_with(markup: &str) -> Document {
        Document::from_html(markup)
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("  "), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("div,"), Err(SelectorError::Empty));
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert!(matches!(
            SelectorList::parse("div > p"),
            Err(SelectorError::UnsupportedToken(_))
        ));
        assert!(matches!(
            SelectorList::parse("a[href]"),
            Err(SelectorError::UnsupportedToken(_))
        ));
    }

    #[test]
    fn test_tag_and_class_match() {
        let doc = doc_with(r#"<div class="nav active"></div><p class="nav"></p>"#);
        let list = SelectorList::parse("div.nav").unwrap();
        let hits = doc.query_selector_all(doc.root(), &list);
        assert_eq!(hits.len(), 1);
        assert_eq!(doc.element(hits[0]).unwrap().tag, "div");
    }

    #[test]
    fn test_class_does_not_match_substring() {
        let doc = doc_with(r#"<div class="inactive-foo"></div>"#);
        let list = SelectorList::parse(".active").unwrap();
        assert!(doc.query_selector_all(doc.root(), &list).is_empty());
    }

    #[test]
    fn test_id_match() {
        let doc = doc_with(r#"<span id="main"></span><span id="other"></span>"#);
        let list = SelectorList::parse("#main").unwrap();
        let hits = doc.query_selector_all(doc.root(), &list);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_descendant_combinator() {
        let doc = doc_with(
            r#"<section><article><p class="x"></p></article></section><p class="x"></p>"#,
        );
        let list = SelectorList::parse("section p.x").unwrap();
        let hits = doc.query_selector_all(doc.root(), &list);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_selector_list_document_order() {
        let doc = doc_with(r#"<p></p><div></div><p></p>"#);
        let list = SelectorList::parse("div, p").unwrap();
        let hits = doc.query_selector_all(doc.root(), &list);
        let tags: Vec<&str> = hits
            .iter()
            .map(|&id| doc.element(id).unwrap().tag.as_str())
            .collect();
        assert_eq!(tags, vec!["p", "div", "p"]);
    }

    #[test]
    fn test_universal() {
        let doc = doc_with(r#"<div><span></span></div>"#);
        let list = SelectorList::parse("*").unwrap();
        assert_eq!(doc.query_selector_all(doc.root(), &list).len(), 2);
    }
}
