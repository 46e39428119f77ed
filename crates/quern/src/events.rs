//! Event binding and dispatch
//!
//! Listeners live in a registry keyed by (node, event name); `on`
//! accepts space-separated multi-event registration and `trigger`
//! dispatches synchronously. Handlers receive the target node
//! explicitly. Closures have no identity, so `off` drops every handler
//! for the named events on the members.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use quern_dom::NodeId;

use crate::Selection;
use crate::classes::{add_class_name, remove_class_name};

pub(crate) type Handler = Rc<RefCell<dyn FnMut(NodeId)>>;

/// Listener registry shared by all selections of one `Quern`
#[derive(Default)]
pub(crate) struct EventRegistry {
    listeners: HashMap<(NodeId, String), Vec<Handler>>,
}

impl EventRegistry {
    pub(crate) fn add(&mut self, node: NodeId, event: &str, handler: Handler) {
        self.listeners
            .entry((node, event.to_string()))
            .or_default()
            .push(handler);
    }

    pub(crate) fn remove_all(&mut self, node: NodeId, event: &str) {
        self.listeners.remove(&(node, event.to_string()));
    }

    /// Snapshot the handlers for one (node, event) pair
    pub(crate) fn handlers(&self, node: NodeId, event: &str) -> Vec<Handler> {
        self.listeners
            .get(&(node, event.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl Selection {
    /// Register a handler for one or more space-separated events on
    /// every member
    pub fn on(&self, events: &str, handler: impl FnMut(NodeId) + 'static) -> Selection {
        if let Some(set) = self.nodes() {
            let handler: Handler = Rc::new(RefCell::new(handler));
            let mut registry = set.shared.events.borrow_mut();
            for &id in set.members.iter() {
                for event in events.split_whitespace() {
                    registry.add(id, event, handler.clone());
                }
            }
        }
        self.clone()
    }

    /// Drop every handler for the space-separated events on every member
    pub fn off(&self, events: &str) -> Selection {
        if let Some(set) = self.nodes() {
            let mut registry = set.shared.events.borrow_mut();
            for &id in set.members.iter() {
                for event in events.split_whitespace() {
                    registry.remove_all(id, event);
                }
            }
        }
        self.clone()
    }

    /// Synchronously dispatch a named event to every member
    pub fn trigger(&self, event: &str) -> Selection {
        if let Some(set) = self.nodes() {
            for &id in set.members.iter() {
                // Snapshot first; handlers may mutate the registry.
                let handlers = set.shared.events.borrow().handlers(id, event);
                tracing::trace!(?id, event, count = handlers.len(), "dispatch");
                for handler in handlers {
                    (handler.borrow_mut())(id);
                }
            }
        }
        self.clone()
    }

    /// Run the handler when the member's DOM structure is ready
    pub fn ready(&self, handler: impl FnMut(NodeId) + 'static) -> Selection {
        self.on("DOMContentLoaded", handler)
    }

    /// Run the handler when the member's content is fully loaded
    pub fn load(&self, handler: impl FnMut(NodeId) + 'static) -> Selection {
        self.on("load", handler)
    }

    /// Wire hover/active classes ("over"/"down") in place of CSS
    /// pseudo-states
    pub fn mouseable(&self) -> Selection {
        self.mouseable_classes("over", "down")
    }

    /// `mouseable` with caller-chosen hover and active classes.
    ///
    /// On touch-capable hosts the wiring uses touch events instead of
    /// mouse events.
    pub fn mouseable_classes(&self, hover_class: &str, active_class: &str) -> Selection {
        let Some(set) = self.nodes() else {
            return self.clone();
        };
        let touch = set.shared.doc.borrow().supports_touch();
        let (evt_hover, evt_leave, evt_down, evt_up) = if touch {
            ("touchstart", "touchend", "touchstart", "touchend")
        } else {
            ("mouseenter", "mouseleave", "mousedown", "mouseup mouseleave")
        };

        let shared = set.shared.clone();
        let cls = hover_class.to_string();
        self.on(evt_hover, move |id| {
            add_class_name(&mut shared.doc.borrow_mut(), id, &cls)
        });

        let shared = set.shared.clone();
        let hover = hover_class.to_string();
        let active = active_class.to_string();
        self.on(evt_leave, move |id| {
            let mut doc = shared.doc.borrow_mut();
            remove_class_name(&mut doc, id, &active);
            remove_class_name(&mut doc, id, &hover);
        });

        let shared = set.shared.clone();
        let cls = active_class.to_string();
        self.on(evt_down, move |id| {
            add_class_name(&mut shared.doc.borrow_mut(), id, &cls)
        });

        let shared = set.shared.clone();
        let cls = active_class.to_string();
        self.on(evt_up, move |id| {
            remove_class_name(&mut shared.doc.borrow_mut(), id, &cls)
        });

        self.clone()
    }

    /// Run the handler when a member is clicked (or touch-tapped) twice
    /// within 350 ms
    pub fn double_tap(&self, handler: impl FnMut(NodeId) + 'static) -> Selection {
        let Some(set) = self.nodes() else {
            return self.clone();
        };
        let touch = set.shared.doc.borrow().supports_touch();
        let interaction = if touch { "touchend" } else { "click" };
        let handler = Rc::new(RefCell::new(handler));

        for &id in set.members.iter() {
            // Each member gets its own arming flag and reset timer.
            let armed = Rc::new(Cell::new(false));
            let shared = set.shared.clone();
            let handler = handler.clone();
            let tap = move |el: NodeId| {
                if armed.get() {
                    armed.set(false);
                    (handler.borrow_mut())(el);
                } else {
                    armed.set(true);
                    let armed = armed.clone();
                    shared.clock.set_timeout(move || armed.set(false), 350);
                }
            };
            set.shared
                .events
                .borrow_mut()
                .add(id, interaction, Rc::new(RefCell::new(tap)));
        }
        self.clone()
    }
}
