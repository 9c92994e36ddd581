//! Commitment windows.
//!
//! A commitment window is the time range an umpire is considered occupied by
//! a match: it opens a fixed lead time before the start, is aligned down to a
//! quarter-hour boundary, and lasts a fixed duration. The same window drives
//! both poll slot consolidation and conflict detection.
//!
//! All arithmetic is done on absolute instants (epoch seconds), so hour, day,
//! month and year rollovers need no special handling.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Upper bound for any policy parameter: one week.
const MAX_POLICY_MINUTES: i64 = 7 * 24 * 60;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A half-open time range `[start, end)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Window {
    /// Inclusive.
    pub start: DateTime<Utc>,
    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

impl Window {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        (self.start <= instant) && (instant < self.end)
    }

    /// Whether the open interiors of the two windows intersect.
    ///
    /// Windows that merely touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parameters of the commitment window, in whole minutes.
///
/// This is the serde-facing form of [`WindowPolicy`]; missing fields take the
/// defaults, and conversion into a policy validates the ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Buffer before the match start. Default: 30.
    pub lead_minutes: i64,
    /// Length of every calculated window. Default: 120.
    pub duration_minutes: i64,
    /// Window starts are floored to multiples of this. Default: 15.
    pub granularity_minutes: i64,
    /// Maximum distance from a group's anchor for a window to merge into it.
    /// Default: 15.
    pub merge_tolerance_minutes: i64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            lead_minutes: 30,
            duration_minutes: 120,
            granularity_minutes: 15,
            merge_tolerance_minutes: 15,
        }
    }
}

/// Validated commitment-window parameters.
///
/// One policy is shared by slot consolidation and conflict detection so both
/// agree on what "occupied" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicySettings", into = "PolicySettings")]
pub struct WindowPolicy {
    lead: Duration,
    duration: Duration,
    granularity_secs: i64,
    merge_tolerance: Duration,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            lead: Duration::minutes(30),
            duration: Duration::minutes(120),
            granularity_secs: 15 * 60,
            merge_tolerance: Duration::minutes(15),
        }
    }
}

impl TryFrom<PolicySettings> for WindowPolicy {
    type Error = ValidationError;

    fn try_from(settings: PolicySettings) -> Result<Self, Self::Error> {
        Self::new(settings)
    }
}

impl From<WindowPolicy> for PolicySettings {
    fn from(policy: WindowPolicy) -> Self {
        policy.settings()
    }
}

impl WindowPolicy {
    /// Creates a policy after validating every parameter.
    pub fn new(settings: PolicySettings) -> Result<Self, ValidationError> {
        let PolicySettings {
            lead_minutes,
            duration_minutes,
            granularity_minutes,
            merge_tolerance_minutes,
        } = settings;

        check_range("lead_minutes", lead_minutes, 0)?;
        check_range("duration_minutes", duration_minutes, 1)?;
        check_range("merge_tolerance_minutes", merge_tolerance_minutes, 0)?;
        check_range("granularity_minutes", granularity_minutes, 1)?;
        if granularity_minutes > MINUTES_PER_DAY || MINUTES_PER_DAY % granularity_minutes != 0 {
            return Err(ValidationError::InvalidPolicy {
                reason: format!(
                    "granularity_minutes must divide a day evenly, got {granularity_minutes}"
                ),
            });
        }

        Ok(Self {
            lead: Duration::minutes(lead_minutes),
            duration: Duration::minutes(duration_minutes),
            granularity_secs: granularity_minutes * 60,
            merge_tolerance: Duration::minutes(merge_tolerance_minutes),
        })
    }

    /// Returns the policy as plain minute values.
    pub fn settings(&self) -> PolicySettings {
        PolicySettings {
            lead_minutes: self.lead.num_minutes(),
            duration_minutes: self.duration.num_minutes(),
            granularity_minutes: self.granularity_secs / 60,
            merge_tolerance_minutes: self.merge_tolerance.num_minutes(),
        }
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    pub const fn merge_tolerance(&self) -> Duration {
        self.merge_tolerance
    }

    /// Computes the commitment window for a match starting at `instant`.
    ///
    /// The start is `instant - lead`, floored to the granularity boundary with
    /// seconds and sub-second components dropped; the end is `start + duration`.
    pub fn window_for(&self, instant: DateTime<Utc>) -> Window {
        let raw = instant - self.lead;
        let excess_secs = raw.timestamp().rem_euclid(self.granularity_secs);
        let start = raw
            - Duration::seconds(excess_secs)
            - Duration::nanoseconds(i64::from(raw.timestamp_subsec_nanos()));
        Window {
            start,
            end: start + self.duration,
        }
    }
}

fn check_range(field: &str, value: i64, min: i64) -> Result<(), ValidationError> {
    if (min..=MAX_POLICY_MINUTES).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPolicy {
            reason: format!("{field} must be between {min} and {MAX_POLICY_MINUTES}, got {value}"),
        })
    }
}

/// Computes the commitment window for `instant` under the default policy.
pub fn commitment_window(instant: DateTime<Utc>) -> Window {
    WindowPolicy::default().window_for(instant)
}
