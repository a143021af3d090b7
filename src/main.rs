//! wg-reconf - AllowedIPs Rewriter for WireGuard Configs

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use wg_reconf::cli::Cli;
use wg_reconf::exclude::parse_exclusion;
use wg_reconf::fs_abstraction::real_fs;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Fail fast on a bad exclusion range, before touching any file.
    let exclusion = parse_exclusion(&cli.exclude_addr)?;

    let summary = wg_reconf::update::run(
        real_fs(),
        &cli.basedir,
        &cli.key,
        exclusion,
        cli.dry_run,
    )?;

    tracing::info!(
        "{} of {} files {}",
        summary.updated,
        summary.examined,
        if cli.dry_run { "would be updated" } else { "updated" }
    );

    Ok(())
}
