//! Table configuration, loaded from TOML.

use anyhow::{Context, Result};
use disktab_hal::SysfsRoots;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// When false the table is built without enumeration and answers in
    /// identity mode.
    pub enumerate: bool,
    pub sys_block_root: PathBuf,
    pub sys_class_block_root: PathBuf,
    pub sys_dev_block_root: PathBuf,
    pub dev_root: PathBuf,
}

impl Default for TableConfig {
    fn default() -> Self {
        let roots = SysfsRoots::default();
        Self {
            enumerate: true,
            sys_block_root: roots.sys_block_root,
            sys_class_block_root: roots.sys_class_block_root,
            sys_dev_block_root: roots.sys_dev_block_root,
            dev_root: roots.dev_root,
        }
    }
}

impl TableConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn sysfs_roots(&self) -> SysfsRoots {
        SysfsRoots {
            sys_block_root: self.sys_block_root.clone(),
            sys_class_block_root: self.sys_class_block_root.clone(),
            sys_dev_block_root: self.sys_dev_block_root.clone(),
            dev_root: self.dev_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_config_is_default() {
        let cfg = TableConfig::from_toml("").unwrap();
        assert_eq!(cfg, TableConfig::default());
        assert!(cfg.enumerate);
        assert_eq!(cfg.sys_block_root, PathBuf::from("/sys/block"));
        assert_eq!(cfg.sysfs_roots(), SysfsRoots::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let cfg = TableConfig::from_toml(
            "enumerate = false\nsys_block_root = \"/tmp/sys/block\"\n",
        )
        .unwrap();
        assert!(!cfg.enumerate);
        assert_eq!(cfg.sys_block_root, PathBuf::from("/tmp/sys/block"));
        assert_eq!(cfg.dev_root, PathBuf::from("/dev"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(TableConfig::from_toml("rotational = true\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let tmp = tempdir().unwrap();
        let err = TableConfig::load(&tmp.path().join("disktab.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));

        let path = tmp.path().join("ok.toml");
        fs::write(&path, "dev_root = \"/devices\"\n").unwrap();
        assert_eq!(
            TableConfig::load(&path).unwrap().dev_root,
            PathBuf::from("/devices")
        );
    }
}
