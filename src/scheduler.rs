//! Cooperative replacement for the page's repeating interval timers.
//!
//! The frame loop feeds measured elapsed time into [`Scheduler::advance`]; each
//! live timer reports how many of its intervals completed. There is at most one
//! timer per widget.

use std::collections::BTreeMap;
use std::time::Duration;

/// Upper bound on ticks a single timer may fire for one `advance` call.
pub(crate) const MAX_CATCH_UP_TICKS: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum TimerId {
    Jupiter,
    Venus,
}

#[derive(Clone, Copy, Debug)]
struct Interval {
    every: Duration,
    accum: Duration,
}

#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    timers: BTreeMap<TimerId, Interval>,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer, cancelling any timer the widget already has.
    pub(crate) fn start(&mut self, id: TimerId, every: Duration) {
        if self.cancel(id) {
            tracing::debug!(?id, "replaced running timer");
        }
        let every = every.max(Duration::from_millis(1));
        self.timers.insert(
            id,
            Interval {
                every,
                accum: Duration::ZERO,
            },
        );
        tracing::debug!(?id, every_ms = every.as_millis() as u64, "timer started");
    }

    /// Returns whether a timer was running.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let was = self.timers.remove(&id).is_some();
        if was {
            tracing::debug!(?id, "timer cancelled");
        }
        was
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance every live timer by `dt`, returning the ticks each one fired.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<(TimerId, u32)> {
        let mut fired = Vec::new();
        for (&id, iv) in self.timers.iter_mut() {
            iv.accum = iv.accum.saturating_add(dt);
            let mut ticks = 0u32;
            while iv.accum >= iv.every {
                iv.accum -= iv.every;
                ticks += 1;
                if ticks == MAX_CATCH_UP_TICKS {
                    // drop the backlog instead of spiralling
                    iv.accum = Duration::ZERO;
                    break;
                }
            }
            if ticks > 0 {
                fired.push((id, ticks));
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restarting_keeps_a_single_timer() {
        let mut s = Scheduler::new();
        s.start(TimerId::Venus, Duration::from_millis(50));
        s.start(TimerId::Venus, Duration::from_millis(50));
        assert_eq!(s.active_count(), 1);

        // the restart reset the accumulator, so one interval yields one tick
        assert_eq!(s.advance(Duration::from_millis(50)), vec![(TimerId::Venus, 1)]);
    }

    #[test]
    fn ticks_accumulate_across_frames() {
        let mut s = Scheduler::new();
        s.start(TimerId::Jupiter, Duration::from_millis(100));
        assert!(s.advance(Duration::from_millis(60)).is_empty());
        assert_eq!(s.advance(Duration::from_millis(60)), vec![(TimerId::Jupiter, 1)]);
        assert_eq!(s.advance(Duration::from_millis(180)), vec![(TimerId::Jupiter, 2)]);
    }

    #[test]
    fn long_stall_is_bounded() {
        let mut s = Scheduler::new();
        s.start(TimerId::Venus, Duration::from_millis(50));
        let fired = s.advance(Duration::from_secs(10));
        assert_eq!(fired, vec![(TimerId::Venus, MAX_CATCH_UP_TICKS)]);
        assert!(s.advance(Duration::from_millis(10)).is_empty());
    }

    #[test]
    fn timers_are_independent() {
        let mut s = Scheduler::new();
        s.start(TimerId::Jupiter, Duration::from_millis(100));
        s.start(TimerId::Venus, Duration::from_millis(50));
        assert_eq!(
            s.advance(Duration::from_millis(100)),
            vec![(TimerId::Jupiter, 1), (TimerId::Venus, 2)]
        );
        assert!(s.cancel(TimerId::Jupiter));
        assert!(!s.cancel(TimerId::Jupiter));
        assert!(s.is_active(TimerId::Venus));
        assert_eq!(s.active_count(), 1);
    }
}
