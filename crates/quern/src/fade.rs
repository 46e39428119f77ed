//! Opacity fades
//!
//! Each fading element runs its own 25 ms interval on the shared clock.
//! The per-tick step is `25 / duration`, so a fade covers the full
//! opacity range in `duration` milliseconds and then clamps, stops its
//! interval, and (for fade-out) hides the element. Timer state is owned
//! by the tick closure, so overlapping fades on different elements never
//! interfere.

use std::cell::Cell;
use std::rc::Rc;

use crate::{Error, Selection};

/// Interval between opacity steps, in milliseconds
pub const FADE_TICK_MS: u64 = 25;

/// Fade duration when the caller passes `None`
pub const DEFAULT_FADE_MS: f64 = 400.0;

fn validate_duration(duration_ms: Option<f64>) -> Result<f64, Error> {
    match duration_ms {
        None => Ok(DEFAULT_FADE_MS),
        Some(ms) if ms.is_finite() && ms > 0.0 => Ok(ms),
        Some(ms) => Err(Error::InvalidArgument(format!(
            "fade duration must be a positive number of milliseconds, got {ms}"
        ))),
    }
}

impl Selection {
    /// Fade every hidden member in over `duration_ms` (default 400 ms).
    ///
    /// Members already shown with `display: block` are skipped.
    pub fn fade_in(&self, duration_ms: Option<f64>) -> Result<Selection, Error> {
        let duration = validate_duration(duration_ms)?;
        Ok(self.fade(duration, true))
    }

    /// Fade every visible member out over `duration_ms` (default 400 ms),
    /// then hide it.
    ///
    /// Members already hidden with `display: none` are skipped.
    pub fn fade_out(&self, duration_ms: Option<f64>) -> Result<Selection, Error> {
        let duration = validate_duration(duration_ms)?;
        Ok(self.fade(duration, false))
    }

    fn fade(&self, duration_ms: f64, fading_in: bool) -> Selection {
        let Some(set) = self.nodes() else {
            return self.clone();
        };
        let step = FADE_TICK_MS as f64 / duration_ms;

        for &id in set.members.iter() {
            {
                let mut doc = set.shared.doc.borrow_mut();
                let display = doc.style(id, "display");
                if fading_in && display == Some("block") {
                    continue;
                }
                if !fading_in && display == Some("none") {
                    continue;
                }
                // The element is visible for the whole run; the first
                // frame already carries the starting opacity.
                let start = if fading_in { 0.01 } else { 1.0 };
                doc.set_style(id, "display", "block");
                doc.set_style(id, "opacity", &format_opacity(start));
            }
            tracing::trace!(?id, duration_ms, fading_in, "fade start");

            let shared = set.shared.clone();
            let timer: Rc<Cell<Option<quern_runtime::TimerId>>> = Rc::new(Cell::new(None));
            let slot = timer.clone();
            let mut opacity = if fading_in { 0.01 } else { 1.0 };
            let tick = move || {
                if fading_in {
                    opacity += step;
                } else {
                    opacity -= step;
                }
                let done = if fading_in {
                    opacity >= 0.99
                } else {
                    opacity <= 0.01
                };
                if done {
                    opacity = if fading_in { 1.0 } else { 0.0 };
                }
                let mut doc = shared.doc.borrow_mut();
                doc.set_style(id, "opacity", &format_opacity(opacity));
                if done {
                    if !fading_in {
                        doc.set_style(id, "display", "none");
                    }
                    drop(doc);
                    if let Some(handle) = slot.take() {
                        shared.clock.clear_interval(handle);
                    }
                    tracing::trace!(?id, "fade done");
                }
            };
            timer.set(Some(set.shared.clock.set_interval(tick, FADE_TICK_MS)));
        }
        self.clone()
    }
}

fn format_opacity(value: f64) -> String {
    // Render whole values without a trailing fraction.
    if value == value.trunc() {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Quern};

    fn opacity(q: &Quern, selector: &str) -> f64 {
        let raw = q.select(selector).unwrap().css("opacity").unwrap();
        raw.parse().unwrap()
    }

    #[test]
    fn test_fade_in_saturates_at_duration() {
        let q = Quern::from_html("<div style=\"display: none\"></div>");
        let sel = q.select("div").unwrap();
        sel.fade_in(Some(100.0)).unwrap();
        // Start frame: visible at near-zero opacity.
        assert_eq!(sel.css("display").as_deref(), Some("block"));
        assert_eq!(opacity(&q, "div"), 0.01);
        // 4 ticks of 25 ms at step 0.25 reach full opacity at 100 ms.
        q.advance(75);
        assert!(opacity(&q, "div") < 1.0);
        q.advance(25);
        assert_eq!(opacity(&q, "div"), 1.0);
        // The interval stopped; the clock is idle.
        assert_eq!(q.clock().pending(), 0);
    }

    #[test]
    fn test_fade_in_skips_visible_members() {
        let q = Quern::from_html("<div style=\"display: block; opacity: 1\"></div>");
        let sel = q.select("div").unwrap();
        sel.fade_in(None).unwrap();
        assert_eq!(q.clock().pending(), 0);
        assert_eq!(sel.css("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_fade_out_ends_hidden() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        sel.fade_out(Some(50.0)).unwrap();
        assert_eq!(sel.css("display").as_deref(), Some("block"));
        q.advance(50);
        assert_eq!(opacity(&q, "div"), 0.0);
        assert_eq!(sel.css("display").as_deref(), Some("none"));
        assert_eq!(q.clock().pending(), 0);
    }

    #[test]
    fn test_fade_out_skips_hidden_members() {
        let q = Quern::from_html("<div style=\"display: none\"></div>");
        q.select("div").unwrap().fade_out(None).unwrap();
        assert_eq!(q.clock().pending(), 0);
    }

    #[test]
    fn test_concurrent_fades_are_independent() {
        let q = Quern::from_html(
            "<div id=\"fast\" style=\"display: none\"></div>\
             <div id=\"slow\" style=\"display: none\"></div>",
        );
        q.select("#fast").unwrap().fade_in(Some(50.0)).unwrap();
        q.select("#slow").unwrap().fade_in(Some(200.0)).unwrap();
        q.advance(50);
        assert_eq!(opacity(&q, "#fast"), 1.0);
        assert!(opacity(&q, "#slow") < 1.0);
        q.advance(150);
        assert_eq!(opacity(&q, "#slow"), 1.0);
        assert_eq!(q.clock().pending(), 0);
    }

    #[test]
    fn test_default_duration_is_400ms() {
        let q = Quern::from_html("<div style=\"display: none\"></div>");
        q.select("div").unwrap().fade_in(None).unwrap();
        q.advance(399);
        assert!(opacity(&q, "div") < 1.0);
        q.advance(1);
        assert_eq!(opacity(&q, "div"), 1.0);
    }

    #[test]
    fn test_invalid_durations_rejected() {
        let q = Quern::from_html("<div></div>");
        let sel = q.select("div").unwrap();
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                sel.fade_in(Some(bad)),
                Err(Error::InvalidArgument(_))
            ));
        }
        // Nothing was scheduled by the rejected calls.
        assert_eq!(q.clock().pending(), 0);
    }

    #[test]
    fn test_empty_selection_is_a_no_op() {
        let q = Quern::from_html("<div></div>");
        let empty = q.select(".missing").unwrap();
        assert!(empty.fade_in(Some(100.0)).unwrap().is_empty());
        assert_eq!(q.clock().pending(), 0);
    }
}
