//! Poll slot consolidation.
//!
//! Turns the start instants of a poll's matches into the smallest list of
//! windows to ask umpires about.
//!
//! # Algorithm Summary
//!
//! 1. Map every instant to its commitment window
//! 2. Sort windows by start
//! 3. Sweep once, merging a window into the current group when its start is
//!    within the merge tolerance of the group's *anchor* (the first window of
//!    the group). The anchor never moves, so a chain of windows each 15
//!    minutes apart does not collapse into one group.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, trace};

use crate::window::{Window, WindowPolicy};

/// A group of windows being merged during the sweep.
#[derive(Debug, Clone, Copy)]
struct Group {
    anchor_start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Group {
    const fn open(window: Window) -> Self {
        Self {
            anchor_start: window.start,
            end: window.end,
        }
    }

    const fn finish(self) -> Window {
        Window::new(self.anchor_start, self.end)
    }
}

impl WindowPolicy {
    /// Consolidates match start instants into sorted poll slot windows.
    ///
    /// Input order and duplicates do not affect the result.
    #[instrument(level = "debug", skip_all, fields(instants = instants.len()))]
    pub fn consolidate(&self, instants: &[DateTime<Utc>]) -> Vec<Window> {
        let mut windows: Vec<Window> = instants.iter().map(|&t| self.window_for(t)).collect();
        windows.sort_unstable();

        let mut iter = windows.into_iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };

        let tolerance = self.merge_tolerance();
        let mut slots = Vec::new();
        let mut group = Group::open(first);

        for window in iter {
            if window.start - group.anchor_start <= tolerance {
                trace!(anchor = %group.anchor_start, start = %window.start, "merging window into group");
                group.end = group.end.max(window.end);
            } else {
                slots.push(group.finish());
                group = Group::open(window);
            }
        }
        slots.push(group.finish());

        debug!(slots = slots.len(), "consolidated poll slots");
        slots
    }
}

/// Consolidates match start instants under the default policy.
pub fn consolidate_slots(instants: &[DateTime<Utc>]) -> Vec<Window> {
    WindowPolicy::default().consolidate(instants)
}
