//! Slots command: consolidates a snapshot's matches into poll slots.
//!
//! This is what poll creation persists: one slot per consolidated window.

use std::io::Write;

use anyhow::Result;
use ump_core::{PollPlan, WindowPolicy, plan_new_poll};

use super::util::{Snapshot, write_json};
use crate::config::OutputFormat;

pub fn run<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    policy: &WindowPolicy,
    format: OutputFormat,
) -> Result<()> {
    let plan = plan_new_poll(policy, &snapshot.matches);
    match format {
        OutputFormat::Json => write_json(writer, &plan),
        OutputFormat::Text => write_plan(writer, &plan),
    }
}

fn write_plan<W: Write>(writer: &mut W, plan: &PollPlan) -> Result<()> {
    if plan.windows.is_empty() {
        writeln!(writer, "No poll slots.")?;
    } else {
        writeln!(writer, "Poll slots ({}):", plan.windows.len())?;
        for window in &plan.windows {
            writeln!(writer, "- {window}")?;
        }
    }

    if !plan.unscheduled.is_empty() {
        let ids: Vec<&str> = plan.unscheduled.iter().map(|id| id.as_str()).collect();
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
    fn slots_merge_and_skip_unscheduled() {
        let output = render(
            r#"{"matches": [
                {"id": "m1", "date": "2025-03-15", "start": "2025-03-15T11:00:00Z"},
                {"id": "m2", "date": "2025-03-15", "start": "2025-03-15T11:15:00Z"},
                {"id": "m3", "date": "2025-03-15", "start": "2025-03-15T11:31:00Z"},
                {"id": "m4", "date": "2025-03-16"}
            ]}"#,
            OutputFormat::Text,
        );
        assert_snapshot!(output.trim_end(), @r"
        Poll slots (2):
        - 2025-03-15 10:30 - 2025-03-15 12:45
        - 2025-03-15 11:00 - 2025-03-15 13:00
        Skipped (no start time): m4
        ");
    }

    #[test]
    fn slots_empty_snapshot() {
        let output = render("{}", OutputFormat::Text);
        assert_snapshot!(output.trim_end(), @"No poll slots.");
    }

    #[test]
    fn slots_json_output() {
        let output = render(
            r#"{"matches": [{"id": "m1", "date": "2025-03-15", "start": "2025-03-15T11:15:00Z"}]}"#,
            OutputFormat::Json,
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["windows"][0]["start"], "2025-03-15T10:45:00Z");
        assert_eq!(value["windows"][0]["end"], "2025-03-15T12:45:00Z");
        assert_eq!(value["unscheduled"], serde_json::json!([]));
    }
}
