//! # wg-reconf - AllowedIPs Rewriter for WireGuard Configs
//!
//! Removes an IPv4 range from the `AllowedIPs` lists of WireGuard
//! configuration files. Any listed network that strictly contains the
//! excluded range is replaced by the minimal set of CIDR networks covering
//! the remainder; every other line of the file is left byte-identical.
//!
//! Files whose contents actually change are backed up first: `wg0.conf`
//! is renamed to `wg0.conf~` before the rewritten text is written.
//!
//! ## Example Usage
//!
//! ```no_run
//! use wg_reconf::exclude::parse_exclusion;
//! use wg_reconf::fs_abstraction::real_fs;
//! use wg_reconf::update;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let exclusion = parse_exclusion("10.13.0.0/16")?;
//!     let summary = update::run(
//!         real_fs(),
//!         Path::new("/etc/wireguard"),
//!         "AllowedIPs",
//!         exclusion,
//!         false,
//!     )?;
//!     println!("{} of {} files updated", summary.updated, summary.examined);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`exclude`] - CIDR exclusion via binary subnet splitting
//! - [`rewrite`] - Key/value list rewriting over config text
//! - [`update`] - Per-file driver (read, rewrite, persist if changed)
//! - [`fs_abstraction`] - Filesystem seam, mockable in tests
//! - [`lock`] - Advisory lock held across the backup+overwrite window
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod exclude;
pub mod fs_abstraction;
pub mod lock;
pub mod rewrite;
pub mod update;

pub use cli::Cli;
