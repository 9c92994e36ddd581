//! Reconciliation of persisted poll slots against a desired window set.
//!
//! Availability responses reference slots by ID, so editing a poll must not
//! recreate a slot whose window is unchanged. Slots pair with desired windows
//! by exact equality of start and end; there is no overlap matching and no
//! tolerance. The resulting diff is the only set of storage mutations the
//! caller applies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::types::SlotId;
use crate::window::Window;

/// A persisted window with a stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    #[serde(flatten)]
    pub window: Window,
}

impl Slot {
    pub const fn new(id: SlotId, window: Window) -> Self {
        Self { id, window }
    }
}

/// Storage mutations needed to move from the persisted slots to the desired
/// windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDiff {
    /// Desired windows with no persisted counterpart, in desired order.
    pub to_add: Vec<Window>,
    /// Persisted slots with no desired counterpart, in persisted order.
    pub to_remove: Vec<Slot>,
    /// Persisted slots left untouched, in persisted order.
    pub to_keep: Vec<Slot>,
}

impl SlotDiff {
    /// Whether applying the diff would change nothing in storage.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the add/remove/keep partition for a poll edit.
///
/// Each desired window can be claimed by at most one slot, so duplicate
/// persisted slots for the same window keep one and remove the rest.
#[instrument(level = "debug", skip_all, fields(existing = existing.len(), desired = desired.len()))]
pub fn reconcile_slots(existing: &[Slot], desired: &[Window]) -> SlotDiff {
    // window -> indices into `desired` not yet claimed, in desired order
    let mut unclaimed: HashMap<Window, Vec<usize>> = HashMap::with_capacity(desired.len());
    for (idx, window) in desired.iter().enumerate().rev() {
        unclaimed.entry(*window).or_default().push(idx);
    }

    let mut claimed = vec![false; desired.len()];
    let mut diff = SlotDiff::default();

    for slot in existing {
        match unclaimed.get_mut(&slot.window).and_then(Vec::pop) {
            Some(idx) => {
                claimed[idx] = true;
                diff.to_keep.push(slot.clone());
            }
            None => diff.to_remove.push(slot.clone()),
        }
    }

    diff.to_add = desired
        .iter()
        .zip(&claimed)
        .filter(|&(_, &was_claimed)| !was_claimed)
        .map(|(window, _)| *window)
        .collect();

    debug!(
        add = diff.to_add.len(),
        remove = diff.to_remove.len(),
        keep = diff.to_keep.len(),
        "reconciled poll slots"
    );
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ts(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, m, 0).unwrap()
    }

    fn win(d: u32, h: u32, m: u32) -> Window {
        let start = ts(d, h, m);
        Window::new(start, start + Duration::minutes(120))
    }

    fn slot(id: &str, window: Window) -> Slot {
        Slot::new(SlotId::new(id).unwrap(), window)
    }

    fn values(slots: &[Slot]) -> Vec<Window> {
        slots.iter().map(|s| s.window).collect()
    }

    #[test]
    fn test_keeps_unchanged_and_adds_new() {
        let existing = vec![slot("s1", win(15, 10, 45))];
        let desired = vec![win(15, 10, 45), win(16, 9, 0)];

        let diff = reconcile_slots(&existing, &desired);

        assert_eq!(diff.to_keep, existing);
        assert_eq!(diff.to_add, vec![win(16, 9, 0)]);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_noop_when_nothing_changed() {
        let existing = vec![
            slot("s1", win(15, 10, 45)),
            slot("s2", win(15, 14, 0)),
            slot("s3", win(16, 9, 0)),
        ];
        let diff = reconcile_slots(&existing, &values(&existing));

        assert!(diff.is_noop());
        assert_eq!(diff.to_keep, existing);
    }

    #[test]
    fn test_removes_slots_not_desired() {
        let existing = vec![slot("s1", win(15, 10, 45)), slot("s2", win(15, 14, 0))];
        let diff = reconcile_slots(&existing, &[win(15, 14, 0)]);

        assert_eq!(diff.to_keep, vec![existing[1].clone()]);
        assert_eq!(diff.to_remove, vec![existing[0].clone()]);
        assert!(diff.to_add.is_empty());
    }

    #[test]
    fn test_same_start_different_end_is_replaced() {
        let existing = vec![slot("s1", win(15, 10, 30))];
        let extended = Window::new(ts(15, 10, 30), ts(15, 12, 45));

        let diff = reconcile_slots(&existing, &[extended]);

        assert!(diff.to_keep.is_empty());
        assert_eq!(diff.to_remove, existing);
        assert_eq!(diff.to_add, vec![extended]);
    }

    #[test]
    fn test_overlapping_windows_are_not_matched() {
        let existing = vec![slot("s1", win(15, 10, 30))];
        let diff = reconcile_slots(&existing, &[win(15, 10, 45)]);

        assert_eq!(diff.to_remove.len(), 1);
        assert_eq!(diff.to_add, vec![win(15, 10, 45)]);
    }

    #[test]
    fn test_sub_second_drift_is_a_mismatch() {
        let window = win(15, 10, 45);
        let drifted = Window::new(window.start + Duration::milliseconds(1), window.end);
        let existing = vec![slot("s1", drifted)];

        let diff = reconcile_slots(&existing, &[window]);

        assert_eq!(diff.to_remove, existing);
        assert_eq!(diff.to_add, vec![window]);
    }

    #[test]
    fn test_duplicate_persisted_slots_keep_one() {
        let existing = vec![slot("s1", win(15, 10, 45)), slot("s2", win(15, 10, 45))];
        let diff = reconcile_slots(&existing, &[win(15, 10, 45)]);

        assert_eq!(diff.to_keep, vec![existing[0].clone()]);
        assert_eq!(diff.to_remove, vec![existing[1].clone()]);
        assert!(diff.to_add.is_empty());
    }

    #[test]
    fn test_empty_existing_adds_everything() {
        let desired = vec![win(15, 10, 45), win(16, 9, 0)];
        let diff = reconcile_slots(&[], &desired);
        assert_eq!(diff.to_add, desired);
        assert!(diff.to_keep.is_empty());
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_empty_desired_removes_everything() {
        let existing = vec![slot("s1", win(15, 10, 45))];
        let diff = reconcile_slots(&existing, &[]);
        assert_eq!(diff.to_remove, existing);
        assert!(!diff.is_noop());
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let existing = vec![
            slot("a", win(15, 9, 0)),
            slot("b", win(15, 11, 0)),
            slot("c", win(15, 13, 0)),
            slot("d", win(16, 9, 0)),
        ];
        let desired = vec![win(16, 9, 0), win(15, 12, 0), win(15, 9, 0), win(17, 8, 0)];

        let diff = reconcile_slots(&existing, &desired);

        let mut by_identity: Vec<&str> = diff
            .to_keep
            .iter()
            .chain(&diff.to_remove)
            .map(|s| s.id.as_str())
            .collect();
        by_identity.sort_unstable();
        assert_eq!(by_identity, vec!["a", "b", "c", "d"]);

        for kept in &diff.to_keep {
            assert!(!diff.to_remove.iter().any(|r| r.id == kept.id));
        }

        let mut by_value = values(&diff.to_keep);
        by_value.extend(diff.to_add.iter().copied());
        by_value.sort_unstable();
        let mut expected = desired;
        expected.sort_unstable();
        assert_eq!(by_value, expected);
    }

    #[test]
    fn test_slot_serializes_flat() {
        let s = slot("s1", win(15, 10, 45));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["id"], "s1");
        assert_eq!(json["start"], "2025-03-15T10:45:00Z");
        assert_eq!(json["end"], "2025-03-15T12:45:00Z");
    }
}
