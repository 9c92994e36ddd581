//! Reconcile command: previews the slot changes for a poll edit.
//!
//! The snapshot's `slots` are the currently persisted slots; its `matches`
//! are the newly selected matches.

use std::io::Write;

use anyhow::Result;
use ump_core::{PollEdit, WindowPolicy, plan_poll_edit};

use super::util::{Snapshot, write_json};
use crate::config::OutputFormat;

pub fn run<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    policy: &WindowPolicy,
    format: OutputFormat,
) -> Result<()> {
    let edit = plan_poll_edit(policy, &snapshot.slots, &snapshot.matches);
    match format {
        OutputFormat::Json => write_json(writer, &edit),
        OutputFormat::Text => write_edit(writer, &edit),
    }
}

fn write_edit<W: Write>(writer: &mut W, edit: &PollEdit) -> Result<()> {
    let diff = &edit.diff;
    if diff.is_noop() {
        writeln!(writer, "No changes ({} slots kept).", diff.to_keep.len())?;
    } else {
        writeln!(writer, "Keep ({}):", diff.to_keep.len())?;
        for slot in &diff.to_keep {
            writeln!(writer, "- {}: {}", slot.id, slot.window)?;
        }
        writeln!(writer, "Remove ({}):", diff.to_remove.len())?;
        for slot in &diff.to_remove {
            writeln!(writer, "- {}: {}", slot.id, slot.window)?;
        }
        writeln!(writer, "Add ({}):", diff.to_add.len())?;
        for window in &diff.to_add {
            writeln!(writer, "- {window}")?;
        }
    }

    if !edit.unscheduled.is_empty() {
        let ids: Vec<&str> = edit.unscheduled.iter().map(|id| id.as_str()).collect();
        writeln!(writer, "Skipped (no start time): {}", ids.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn render(json: &str, format: OutputFormat) -> String {
        let snapshot = Snapshot::from_json(json).unwrap();
        let mut output = Vec::new();
        run(&mut output, &snapshot, &WindowPolicy::default(), format).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn reconcile_keeps_existing_and_adds_next_day() {
        let output = render(
            r#"{
                "slots": [{"id": "s1", "start": "2025-03-15T10:45:00Z", "end": "2025-03-15T12:45:00Z"}],
                "matches": [
                    {"id": "m1", "date": "2025-03-15", "start": "2025-03-15T11:15:00Z"},
                    {"id": "m2", "date": "2025-03-16", "start": "2025-03-16T09:30:00Z"}
                ]
            }"#,
            OutputFormat::Text,
        );
        assert_snapshot!(output.trim_end(), @r"
        Keep (1):
        - s1: 2025-03-15 10:45 - 2025-03-15 12:45
        Remove (0):
        Add (1):
        - 2025-03-16 09:00 - 2025-03-16 11:00
        ");
    }

    #[test]
    fn reconcile_unchanged_selection_is_noop() {
        let output = render(
            r#"{
                "slots": [{"id": "s1", "start": "2025-03-15T10:45:00Z", "end": "2025-03-15T12:45:00Z"}],
                "matches": [{"id": "m1", "date": "2025-03-15", "start": "2025-03-15T11:15:00Z"}]
            }"#,
            OutputFormat::Text,
        );
        assert_snapshot!(output.trim_end(), @"No changes (1 slots kept).");
    }

    #[test]
    fn reconcile_json_output() {
        let output = render(
            r#"{
                "slots": [{"id": "old", "start": "2025-03-15T08:00:00Z", "end": "2025-03-15T10:00:00Z"}],
                "matches": [{"id": "m1", "date": "2025-03-15", "start": "2025-03-15T11:15:00Z"}]
            }"#,
            OutputFormat::Json,
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["diff"]["to_remove"][0]["id"], "old");
        assert_eq!(value["diff"]["to_add"][0]["start"], "2025-03-15T10:45:00Z");
        assert_eq!(value["diff"]["to_keep"], serde_json::json!([]));
    }
}
