//! Quern runtime - timer scheduling
//!
//! Single-threaded, cooperative, virtual-clock timers. The host drives
//! time forward with `advance`; timer callbacks are the only asynchrony
//! in the system.

mod scheduler;

pub use scheduler::{Scheduler, TimerId};
