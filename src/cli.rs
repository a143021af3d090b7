//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wg-reconf")]
#[command(author, version, about = "Edits WireGuard configuration files")]
pub struct Cli {
    /// Directory containing the .conf files to rewrite
    #[arg(default_value = ".")]
    pub basedir: PathBuf,

    /// The range of IPv4 addresses to exclude from AllowedIPs
    #[arg(long, value_name = "CIDR")]
    pub exclude_addr: String,

    /// Configuration key whose value list is rewritten
    #[arg(long, default_value = "AllowedIPs")]
    pub key: String,

    /// Report files that would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long)]
    pub verbose: bool,
}
