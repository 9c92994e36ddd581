//! Core scheduling logic for umpire polls and assignments.
//!
//! This crate contains the pure, stateless algorithms for:
//! - Windows: the commitment window an umpire blocks around a match
//! - Consolidation: merging match windows into poll slots
//! - Reconciliation: diffing persisted slots against a new desired set
//! - Conflicts: detecting hard/soft double-bookings per umpire
//!
//! Nothing here performs I/O; callers own persistence and ID issuance.

mod conflict;
mod consolidate;
pub mod poll;
mod reconcile;
pub mod types;
mod window;

pub use conflict::{Assignment, Conflict, ConflictIndex, Match, find_conflicts};
pub use consolidate::consolidate_slots;
pub use poll::{PollEdit, PollPlan, plan_new_poll, plan_poll_edit};
pub use reconcile::{Slot, SlotDiff, reconcile_slots};
pub use types::{MatchId, Severity, SlotId, UmpireId, ValidationError};
pub use window::{PolicySettings, Window, WindowPolicy, commitment_window};
