//! Class list operations
//!
//! Matching is on whitespace boundaries, so "active" never matches
//! inside "inactive-foo".

use quern_dom::{Document, NodeId};

use crate::Selection;

pub(crate) fn class_contains(doc: &Document, id: NodeId, cls: &str) -> bool {
    doc.class_name(id).split_whitespace().any(|c| c == cls)
}

pub(crate) fn add_class_name(doc: &mut Document, id: NodeId, cls: &str) {
    if class_contains(doc, id, cls) {
        return;
    }
    let current = doc.class_name(id);
    let next = if current.is_empty() {
        cls.to_string()
    } else {
        format!("{current} {cls}")
    };
    doc.set_attr(id, "class", &next);
}

pub(crate) fn remove_class_name(doc: &mut Document, id: NodeId, cls: &str) {
    if !class_contains(doc, id, cls) {
        return;
    }
    let next: Vec<&str> = doc
        .class_name(id)
        .split_whitespace()
        .filter(|&c| c != cls)
        .collect();
    doc.set_attr(id, "class", &next.join(" "));
}

impl Selection {
    /// Whether the first member carries the class
    pub fn has_class(&self, cls: &str) -> bool {
        match (self.nodes(), self.first()) {
            (Some(set), Some(id)) => class_contains(&set.shared.doc.borrow(), id, cls),
            _ => false,
        }
    }

    /// Add the class to every member not already carrying it
    pub fn add_class(&self, cls: &str) -> Selection {
        self.each(|doc, id| add_class_name(doc, id, cls))
    }

    /// Remove the class from every member carrying it
    pub fn remove_class(&self, cls: &str) -> Selection {
        self.each(|doc, id| remove_class_name(doc, id, cls))
    }

    /// Toggle the class per member
    pub fn toggle_class(&self, cls: &str) -> Selection {
        self.each(|doc, id| {
            if class_contains(doc, id, cls) {
                remove_class_name(doc, id, cls);
            } else {
                add_class_name(doc, id, cls);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Quern;

    #[test]
    fn test_add_class_is_idempotent() {
        let q = Quern::from_html(r#"<div class="nav"></div>"#);
        let sel = q.select("div").unwrap();
        sel.add_class("active").add_class("active");
        assert_eq!(sel.attr("class").as_deref(), Some("nav active"));
    }

    #[test]
    fn test_toggle_twice_restores_class_string() {
        let q = Quern::from_html(r#"<div class="nav item"></div>"#);
        let sel = q.select("div").unwrap();
        sel.toggle_class("open").toggle_class("open");
        assert_eq!(sel.attr("class").as_deref(), Some("nav item"));
    }

    #[test]
    fn test_has_class_respects_word_boundaries() {
        let q = Quern::from_html(r#"<div class="inactive-foo"></div>"#);
        let sel = q.select("div").unwrap();
        assert!(!sel.has_class("active"));
        assert!(sel.has_class("inactive-foo"));
    }

    #[test]
    fn test_remove_class_keeps_others() {
        let q = Quern::from_html(r#"<div class="a b c"></div>"#);
        let sel = q.select("div").unwrap();
        sel.remove_class("b");
        assert_eq!(sel.attr("class").as_deref(), Some("a c"));
    }

    #[test]
    fn test_add_class_on_classless_element() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        sel.add_class("solo");
        assert_eq!(sel.attr("class").as_deref(), Some("solo"));
    }
}
