//! Shared utilities for CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ump_core::{Assignment, Match, Slot};

use crate::config::OutputFormat;

/// A point-in-time view of a poll and its assignments.
///
/// Every field defaults to empty, so a snapshot for `slots` only needs
/// `matches`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub matches: Vec<Match>,
    pub assignments: Vec<Assignment>,
    pub slots: Vec<Slot>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse snapshot JSON")
    }

    /// Reads a snapshot from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = if path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read snapshot from stdin")?;
            buf
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read snapshot {}", path.display()))?
        };
        Self::from_json(&json)
    }
}

/// Parse an RFC 3339 instant with any offset, normalized to UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let Ok(dt) = DateTime::parse_from_rfc3339(s) else {
        anyhow::bail!("Invalid instant: {s}. Use RFC 3339 (e.g., 2025-03-15T11:15:00Z)");
    };
    Ok(dt.with_timezone(&Utc))
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).context("failed to serialize output")?;
    writeln!(writer)?;
    Ok(())
}

/// Resolves the effective output format: `--json` wins over configuration.
pub const fn output_format(json_flag: bool, configured: OutputFormat) -> OutputFormat {
    if json_flag {
        OutputFormat::Json
    } else {
        configured
    }
}
