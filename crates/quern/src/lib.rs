//! Quern - chainable DOM manipulation
//!
//! A selector resolves into an ordered working set; every operation
//! applies once per member, in order, and chainable operations hand the
//! set back for the next call. Fades are the only asynchronous work,
//! driven by 25 ms virtual-clock timers.
//!
//! ```
//! use quern::Quern;
//!
//! let q = Quern::from_html(r#"<nav><a class="item">one</a><a class="item">two</a></nav>"#);
//! q.select("a.item")?
//!     .set_attr("href", "#")
//!     .add_class("ready");
//! assert_eq!(q.select(".ready")?.len(), 2);
//! # Ok::<(), quern::Error>(())
//! ```

mod attrs;
mod classes;
mod content;
mod error;
mod events;
mod fade;
mod geometry;
mod selection;
mod style;

pub use content::Content;
pub use error::Error;
pub use fade::{DEFAULT_FADE_MS, FADE_TICK_MS};
pub use selection::{NodeSet, Quern, Selection, Target};

pub use quern_dom::{Document, ElementGeometry, InsertPosition, NodeId};
pub use quern_runtime::{Scheduler, TimerId};
