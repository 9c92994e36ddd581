//! Slot planning for poll creation and editing.
//!
//! Matches without a known start cannot produce a commitment window; they are
//! left out of the slot set and reported back so the caller can surface them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::conflict::Match;
use crate::reconcile::{Slot, SlotDiff, reconcile_slots};
use crate::types::MatchId;
use crate::window::{Window, WindowPolicy};

/// Slots to create for a new poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollPlan {
    pub windows: Vec<Window>,
    /// Selected matches skipped for lacking a start.
    pub unscheduled: Vec<MatchId>,
}

/// Storage changes for an edited poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollEdit {
    pub diff: SlotDiff,
    /// Selected matches skipped for lacking a start.
    pub unscheduled: Vec<MatchId>,
}

/// Splits selected matches into start instants and unscheduled match IDs.
pub fn start_instants(matches: &[Match]) -> (Vec<DateTime<Utc>>, Vec<MatchId>) {
    let mut instants = Vec::with_capacity(matches.len());
    let mut unscheduled = Vec::new();
    for m in matches {
        match m.start {
            Some(start) => instants.push(start),
            None => {
                debug!(match_id = %m.id, "match has no start, excluded from poll slots");
                unscheduled.push(m.id.clone());
            }
        }
    }
    (instants, unscheduled)
}

/// Plans the slots for a poll over `matches`. Nothing is persisted yet, so no
/// reconciliation is needed.
pub fn plan_new_poll(policy: &WindowPolicy, matches: &[Match]) -> PollPlan {
    let (instants, unscheduled) = start_instants(matches);
    PollPlan {
        windows: policy.consolidate(&instants),
        unscheduled,
    }
}

/// Plans the slot changes when a poll's match selection is edited.
///
/// Only `diff.to_add` and `diff.to_remove` should be applied; kept slots and
/// the responses referencing them stay untouched.
pub fn plan_poll_edit(policy: &WindowPolicy, existing: &[Slot], matches: &[Match]) -> PollEdit {
    let (instants, unscheduled) = start_instants(matches);
    let desired = policy.consolidate(&instants);
    PollEdit {
        diff: reconcile_slots(existing, &desired),
        unscheduled,
    }
}
