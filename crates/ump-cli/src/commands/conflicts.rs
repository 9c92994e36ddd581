//! Conflicts command: lists double-bookings in an assignment snapshot.

use std::io::Write;

use anyhow::Result;
use ump_core::{Conflict, WindowPolicy};

use super::util::{Snapshot, write_json};
use crate::config::OutputFormat;

pub fn run<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    policy: &WindowPolicy,
    format: OutputFormat,
) -> Result<()> {
    let conflicts = policy.find_conflicts(&snapshot.assignments, &snapshot.matches);
    match format {
        OutputFormat::Json => write_json(writer, &conflicts),
        OutputFormat::Text => write_conflicts(writer, &conflicts),
    }
}

fn write_conflicts<W: Write>(writer: &mut W, conflicts: &[Conflict]) -> Result<()> {
    if conflicts.is_empty() {
        writeln!(writer, "No conflicts.")?;
        return Ok(());
    }

    writeln!(writer, "Conflicts ({}):", conflicts.len())?;
    for c in conflicts {
        writeln!(
            writer,
            "- [{}] {}: {} clashes with {}",
            c.severity, c.umpire, c.match_id, c.conflicting_match_id
        )?;
    }
    Ok(())
}
