//! Whole-disk resolution and rotational classification for I/O scheduling.
//!
//! [`MountTable`] maps partition device numbers to their whole disk and
//! records which disks are non-rotational, so a caller can pick sequential
//! reads for spinning media and parallel reads for everything else.

use anyhow::bail;
use clap::Parser;

pub mod cli;
pub mod config;
pub mod enumerate;
pub mod logging;
pub mod report;
pub mod table;

pub use config::TableConfig;
pub use disktab_error::{TableError, TableResult};
pub use disktab_hal::{DevId, Rotational};
pub use enumerate::{DeviceEnumerator, EnumerationMode};
pub use table::{MountTable, PathReport};

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_with(cli.log_file.clone());

    let cfg = cli.table_config()?;
    let table = MountTable::from_config(&cfg);

    let mut out = std::io::stdout().lock();
    if cli.list {
        report::write_listing(&mut out, &table)?;
    }
    let failed = report::write_reports(&mut out, &table, &cli.paths, cli.json)?;
    table.destroy();

    if !failed.is_empty() {
        bail!("{} path(s) could not be resolved", failed.len());
    }
    Ok(())
}
