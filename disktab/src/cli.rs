//! CLI argument parsing for disktab

use crate::config::TableConfig;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "disktab")]
#[command(about = "Show the whole disk behind each path and whether it is rotational")]
pub struct Cli {
    /// Paths to classify
    pub paths: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Skip device enumeration (every device is its own disk)
    #[arg(long)]
    pub no_enumerate: bool,

    /// Print the partition and disk tables
    #[arg(long)]
    pub list: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Config file values with command line overrides applied.
    pub fn table_config(&self) -> Result<TableConfig> {
        let mut cfg = match &self.config {
            Some(path) => TableConfig::load(path)?,
            None => TableConfig::default(),
        };
        if self.no_enumerate {
            cfg.enumerate = false;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_flags() {
        let cli = Cli::try_parse_from(["disktab", "--list", "--json", "/", "/home"]).unwrap();
        assert!(cli.list);
        assert!(cli.json);
        assert_eq!(cli.paths, vec![PathBuf::from("/"), PathBuf::from("/home")]);
        assert!(cli.table_config().unwrap().enumerate);
    }

    #[test]
    fn no_enumerate_overrides_config() {
        let cli = Cli::try_parse_from(["disktab", "--no-enumerate"]).unwrap();
        let cfg = cli.table_config().unwrap();
        assert!(!cfg.enumerate);
        assert!(cli.paths.is_empty());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["disktab", "-c", "/nonexistent/disktab.toml"]).unwrap();
        assert!(cli.table_config().is_err());
    }
}
