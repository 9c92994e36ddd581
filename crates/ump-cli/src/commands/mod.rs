//! CLI subcommand implementations.

pub mod conflicts;
pub mod reconcile;
pub mod slots;
pub mod util;
pub mod window;
