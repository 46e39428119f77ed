//! Virtual-clock timer scheduler
//!
//! Due callbacks run in (due-time, id) order. The entry is rescheduled
//! (or removed) before its callback is invoked and no internal borrow is
//! held across the call, so callbacks may freely schedule new timers or
//! clear existing ones, including their own interval.

use std::cell::RefCell;
use std::rc::Rc;

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct TimerEntry {
    id: TimerId,
    due: u64,
    /// Repeat period; None for one-shot timers
    period: Option<u64>,
    callback: Rc<RefCell<dyn FnMut()>>,
}

#[derive(Default)]
struct Inner {
    now: u64,
    next_id: u64,
    timers: Vec<TimerEntry>,
}

/// Single-threaded timer scheduler with a virtual millisecond clock
#[derive(Default)]
pub struct Scheduler {
    inner: RefCell<Inner>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in ms
    pub fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    /// Number of live timers
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Schedule a one-shot callback after `delay_ms`
    pub fn set_timeout(&self, callback: impl FnMut() + 'static, delay_ms: u64) -> TimerId {
        self.schedule(Rc::new(RefCell::new(callback)), delay_ms, None)
    }

    /// Schedule a repeating callback every `delay_ms`
    pub fn set_interval(&self, callback: impl FnMut() + 'static, delay_ms: u64) -> TimerId {
        // A zero period would never let `advance` terminate.
        let period = delay_ms.max(1);
        self.schedule(Rc::new(RefCell::new(callback)), period, Some(period))
    }

    fn schedule(
        &self,
        callback: Rc<RefCell<dyn FnMut()>>,
        delay_ms: u64,
        period: Option<u64>,
    ) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let due = inner.now + delay_ms;
        inner.timers.push(TimerEntry {
            id,
            due,
            period,
            callback,
        });
        tracing::trace!(?id, due, repeat = period.is_some(), "timer scheduled");
        id
    }

    /// Cancel a one-shot timer
    pub fn clear_timeout(&self, id: TimerId) {
        self.clear(id);
    }

    /// Cancel a repeating timer
    pub fn clear_interval(&self, id: TimerId) {
        self.clear(id);
    }

    fn clear(&self, id: TimerId) {
        self.inner.borrow_mut().timers.retain(|t| t.id != id);
    }

    /// Advance the clock by `delta_ms`, running every callback that
    /// becomes due, in (due-time, id) order. An interval elapsed more
    /// than once fires once per period.
    pub fn advance(&self, delta_ms: u64) {
        let target = self.inner.borrow().now + delta_ms;
        loop {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                let next = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id.0))
                    .map(|(pos, _)| pos);
                let Some(pos) = next else {
                    inner.now = target;
                    break;
                };
                let due = inner.timers[pos].due;
                inner.now = inner.now.max(due);
                match inner.timers[pos].period {
                    Some(period) => {
                        inner.timers[pos].due = due + period;
                        inner.timers[pos].callback.clone()
                    }
                    None => inner.timers.remove(pos).callback,
                }
            };
            // No borrow is held here; the callback may re-enter.
            (callback.borrow_mut())();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_timeout_fires_once() {
        let sched = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        sched.set_timeout(move || h.set(h.get() + 1), 50);
        sched.advance(49);
        assert_eq!(hits.get(), 0);
        sched.advance(1);
        assert_eq!(hits.get(), 1);
        sched.advance(500);
        assert_eq!(hits.get(), 1);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_interval_fires_per_period() {
        let sched = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        sched.set_interval(move || h.set(h.get() + 1), 25);
        sched.advance(100);
        assert_eq!(hits.get(), 4);
        assert_eq!(sched.now(), 100);
    }

    #[test]
    fn test_clear_interval_stops_firing() {
        let sched = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = sched.set_interval(move || h.set(h.get() + 1), 10);
        sched.advance(30);
        sched.clear_interval(id);
        sched.advance(100);
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn test_callback_clears_own_interval() {
        let sched = Rc::new(Scheduler::new());
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let (s, h, cell) = (sched.clone(), hits.clone(), slot.clone());
        let id = sched.set_interval(
            move || {
                h.set(h.get() + 1);
                if h.get() == 3 {
                    if let Some(id) = cell.get() {
                        s.clear_interval(id);
                    }
                }
            },
            25,
        );
        slot.set(Some(id));
        sched.advance(1000);
        assert_eq!(hits.get(), 3);
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.now(), 1000);
    }

    #[test]
    fn test_due_order_breaks_ties_by_id() {
        let sched = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        sched.set_timeout(move || a.borrow_mut().push("first"), 10);
        sched.set_timeout(move || b.borrow_mut().push("second"), 10);
        sched.advance(10);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_callback_can_schedule_more_work() {
        let sched = Rc::new(Scheduler::new());
        let hits = Rc::new(Cell::new(0));
        let (s, h) = (sched.clone(), hits.clone());
        sched.set_timeout(
            move || {
                let h2 = h.clone();
                s.set_timeout(move || h2.set(h2.get() + 1), 10);
            },
            10,
        );
        sched.advance(20);
        assert_eq!(hits.get(), 1);
    }
}
