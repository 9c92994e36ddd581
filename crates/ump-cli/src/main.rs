use std::io::{BufWriter, Write, stdout};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ump_cli::commands::util::{Snapshot, output_format};
use ump_cli::commands::{conflicts, reconcile, slots, window};
use ump_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let format = output_format(cli.json, config.output);

    let stdout = stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match command {
        Commands::Window { instant } => {
            window::run(&mut writer, instant, &config.policy, format)?;
        }
        Commands::Slots { snapshot } => {
            let snapshot = Snapshot::load(snapshot)?;
            slots::run(&mut writer, &snapshot, &config.policy, format)?;
        }
        Commands::Reconcile { snapshot } => {
            let snapshot = Snapshot::load(snapshot)?;
            reconcile::run(&mut writer, &snapshot, &config.policy, format)?;
        }
        Commands::Conflicts { snapshot } => {
            let snapshot = Snapshot::load(snapshot)?;
            conflicts::run(&mut writer, &snapshot, &config.policy, format)?;
        }
    }

    writer.flush()?;
    Ok(())
}
