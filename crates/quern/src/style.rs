//! Inline style operations and visibility
//!
//! `css` reads the first member; setters chain. Delayed show/hide go
//! through a one-shot timer on the shared clock.

use crate::Selection;

impl Selection {
    /// Inline style property of the first member
    pub fn css(&self, prop: &str) -> Option<String> {
        let set = self.nodes()?;
        let id = self.first()?;
        set.shared.doc.borrow().style(id, prop).map(str::to_string)
    }

    /// Set one inline style property on every member
    pub fn set_css(&self, prop: &str, value: &str) -> Selection {
        self.each(|doc, id| doc.set_style(id, prop, value))
    }

    /// Set a batch of inline style properties on every member
    pub fn set_styles(&self, props: &[(&str, &str)]) -> Selection {
        self.each(|doc, id| {
            for (prop, value) in props {
                doc.set_style(id, prop, value);
            }
        })
    }

    /// Make every member visible immediately
    pub fn show(&self) -> Selection {
        self.set_css("display", "block")
    }

    /// Hide every member immediately
    pub fn hide(&self) -> Selection {
        self.set_css("display", "none")
    }

    /// Make every member visible after `delay_ms`
    pub fn show_after(&self, delay_ms: u64) -> Selection {
        self.display_after("block", delay_ms)
    }

    /// Hide every member after `delay_ms`
    pub fn hide_after(&self, delay_ms: u64) -> Selection {
        self.display_after("none", delay_ms)
    }

    fn display_after(&self, value: &str, delay_ms: u64) -> Selection {
        if let Some(set) = self.nodes() {
            for &id in set.members.iter() {
                let shared = set.shared.clone();
                let value = value.to_string();
                set.shared.clock.set_timeout(
                    move || shared.doc.borrow_mut().set_style(id, "display", &value),
                    delay_ms,
                );
            }
        }
        self.clone()
    }
}
