//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Umpire scheduling engine.
///
/// Computes commitment windows, poll slots, slot diffs for poll edits, and
/// assignment conflicts from a JSON schedule snapshot.
#[derive(Debug, Parser)]
#[command(name = "ump", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the commitment window around a match start.
    Window {
        /// Match start in RFC 3339 (e.g., 2025-03-15T11:15:00Z).
        instant: String,
    },

    /// Consolidate the snapshot's matches into poll slots.
    Slots {
        /// Snapshot JSON file, or `-` for stdin.
        snapshot: PathBuf,
    },

    /// Diff the snapshot's persisted slots against its selected matches.
    Reconcile {
        /// Snapshot JSON file, or `-` for stdin.
        snapshot: PathBuf,
    },

    /// List double-bookings among the snapshot's assignments.
    Conflicts {
        /// Snapshot JSON file, or `-` for stdin.
        snapshot: PathBuf,
    },
}
