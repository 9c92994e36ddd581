//! Double-booking detection for umpire assignments.
//!
//! Conflicts are derived on demand from the current assignment and match
//! snapshot and never stored. Detection is partitioned by umpire: two
//! umpires on the same match are never compared.
//!
//! For each umpire, every pair of distinct assigned matches on the same
//! calendar date is flagged:
//! - `Hard` when both starts are known and their commitment windows overlap,
//! - `Soft` otherwise (windows apart, or a start not yet scheduled).
//!
//! Matches on different dates are never flagged. Every conflict is reported
//! in both directions with the same severity.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::types::{MatchId, Severity, UmpireId};
use crate::window::WindowPolicy;

/// A scheduled match as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Calendar date the match is played on.
    pub date: NaiveDate,
    /// Scheduled start, if already known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
}

impl Match {
    pub const fn new(id: MatchId, date: NaiveDate, start: Option<DateTime<Utc>>) -> Self {
        Self { id, date, start }
    }
}

/// An umpire assigned to a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub umpire: UmpireId,
    pub match_id: MatchId,
}

impl Assignment {
    pub const fn new(umpire: UmpireId, match_id: MatchId) -> Self {
        Self { umpire, match_id }
    }
}

/// A detected double-booking, from the point of view of `match_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conflict {
    pub umpire: UmpireId,
    pub match_id: MatchId,
    pub conflicting_match_id: MatchId,
    pub severity: Severity,
}

impl WindowPolicy {
    /// Finds all conflicts among `assignments`.
    ///
    /// Assignments naming a match absent from `matches` are ignored. Output is
    /// grouped by umpire in ID order; within an umpire, pairs follow the order
    /// in which matches were first assigned.
    #[instrument(level = "debug", skip_all, fields(assignments = assignments.len(), matches = matches.len()))]
    pub fn find_conflicts(&self, assignments: &[Assignment], matches: &[Match]) -> Vec<Conflict> {
        let by_id: HashMap<&MatchId, &Match> = matches.iter().map(|m| (&m.id, m)).collect();

        let mut by_umpire: BTreeMap<&UmpireId, Vec<&Match>> = BTreeMap::new();
        for assignment in assignments {
            let Some(&m) = by_id.get(&assignment.match_id) else {
                trace!(match_id = %assignment.match_id, "assignment references unknown match");
                continue;
            };
            let assigned = by_umpire.entry(&assignment.umpire).or_default();
            if !assigned.iter().any(|a| a.id == m.id) {
                assigned.push(m);
            }
        }

        let mut conflicts = Vec::new();
        for (umpire, assigned) in by_umpire {
            for (i, a) in assigned.iter().enumerate() {
                for b in &assigned[i + 1..] {
                    let Some(severity) = self.pair_severity(a, b) else {
                        continue;
                    };
                    conflicts.push(Conflict {
                        umpire: umpire.clone(),
                        match_id: a.id.clone(),
                        conflicting_match_id: b.id.clone(),
                        severity,
                    });
                    conflicts.push(Conflict {
                        umpire: umpire.clone(),
                        match_id: b.id.clone(),
                        conflicting_match_id: a.id.clone(),
                        severity,
                    });
                }
            }
        }

        debug!(conflicts = conflicts.len(), "computed assignment conflicts");
        conflicts
    }

    /// Classifies a pair of matches worked by the same umpire.
    fn pair_severity(&self, a: &Match, b: &Match) -> Option<Severity> {
        if a.date != b.date {
            return None;
        }
        match (a.start, b.start) {
            (Some(a_start), Some(b_start))
                if self.window_for(a_start).overlaps(&self.window_for(b_start)) =>
            {
                Some(Severity::Hard)
            }
            _ => Some(Severity::Soft),
        }
    }
}

/// Finds all conflicts under the default policy.
pub fn find_conflicts(assignments: &[Assignment], matches: &[Match]) -> Vec<Conflict> {
    WindowPolicy::default().find_conflicts(assignments, matches)
}

/// Per-cell lookup over a conflict list, for annotating an assignment grid.
#[derive(Debug, Clone, Default)]
pub struct ConflictIndex {
    cells: HashMap<(UmpireId, MatchId), Cell>,
}

#[derive(Debug, Clone)]
struct Cell {
    severity: Severity,
    conflicting: Vec<MatchId>,
}

impl ConflictIndex {
    pub fn new(conflicts: &[Conflict]) -> Self {
        let mut cells: HashMap<(UmpireId, MatchId), Cell> = HashMap::new();
        for conflict in conflicts {
            let key = (conflict.umpire.clone(), conflict.match_id.clone());
            let cell = cells.entry(key).or_insert_with(|| Cell {
                severity: conflict.severity,
                conflicting: Vec::new(),
            });
            cell.severity = cell.severity.max(conflict.severity);
            if !cell.conflicting.contains(&conflict.conflicting_match_id) {
                cell.conflicting.push(conflict.conflicting_match_id.clone());
            }
        }
        Self { cells }
    }

    /// Strongest severity affecting the umpire on this match, if any.
    pub fn severity_for(&self, umpire: &UmpireId, match_id: &MatchId) -> Option<Severity> {
        self.cell(umpire, match_id).map(|c| c.severity)
    }

    /// Matches that clash with this one for the umpire.
    pub fn conflicts_for(&self, umpire: &UmpireId, match_id: &MatchId) -> &[MatchId] {
        self.cell(umpire, match_id)
            .map(|c| c.conflicting.as_slice())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn cell(&self, umpire: &UmpireId, match_id: &MatchId) -> Option<&Cell> {
        // HashMap<(A, B), _> can't be queried with (&A, &B) without a clone.
        self.cells.get(&(umpire.clone(), match_id.clone()))
    }
}
