//! Attribute operations and the dataset convenience
//!
//! Getters are terminal (first member); setters chain.

use crate::Selection;

/// Reserved prefix for the caller-keyed dataset convenience
const VALUE_PREFIX: &str = "data-value-";

impl Selection {
    /// Attribute value of the first member
    pub fn attr(&self, name: &str) -> Option<String> {
        let set = self.nodes()?;
        let id = self.first()?;
        set.shared.doc.borrow().attr(id, name).map(str::to_string)
    }

    /// Set an attribute on every member
    pub fn set_attr(&self, name: &str, value: &str) -> Selection {
        self.each(|doc, id| doc.set_attr(id, name, value))
    }

    /// Whether the first member has the attribute
    pub fn has_attr(&self, name: &str) -> bool {
        match (self.nodes(), self.first()) {
            (Some(set), Some(id)) => set.shared.doc.borrow().has_attr(id, name),
            _ => false,
        }
    }

    /// Remove an attribute from every member
    pub fn remove_attr(&self, name: &str) -> Selection {
        self.each(|doc, id| {
            doc.remove_attr(id, name);
        })
    }

    /// Assign an arbitrary named string to every member
    pub fn set_val(&self, name: &str, content: &str) -> Selection {
        self.set_attr(&format!("{VALUE_PREFIX}{name}"), content)
    }

    /// Read the named string from the first member
    pub fn val(&self, name: &str) -> Option<String> {
        self.attr(&format!("{VALUE_PREFIX}{name}"))
    }

    /// Remove the named string from every member
    pub fn remove_val(&self, name: &str) -> Selection {
        self.remove_attr(&format!("{VALUE_PREFIX}{name}"))
    }
}
