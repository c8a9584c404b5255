//! Linux HAL implementation using sysfs and real system calls.

use super::{DeviceOps, DeviceRecord, NodeKind, NodeStat, RotationalOps, StatOps, WholeDisk};
use crate::sysfs::block;
use crate::{DevId, HalResult, Rotational};
use std::path::{Path, PathBuf};

/// Where the kernel's block device information is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsRoots {
    /// Root of the `<dev>/queue/rotational` attributes.
    pub sys_block_root: PathBuf,
    /// One entry per disk and partition.
    pub sys_class_block_root: PathBuf,
    /// `MAJ:MIN` links into the device tree.
    pub sys_dev_block_root: PathBuf,
    pub dev_root: PathBuf,
}

impl Default for SysfsRoots {
    fn default() -> Self {
        Self {
            sys_block_root: PathBuf::from("/sys/block"),
            sys_class_block_root: PathBuf::from("/sys/class/block"),
            sys_dev_block_root: PathBuf::from("/sys/dev/block"),
            dev_root: PathBuf::from("/dev"),
        }
    }
}

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal {
    roots: SysfsRoots,
}

impl LinuxHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roots(roots: SysfsRoots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &SysfsRoots {
        &self.roots
    }
}

impl DeviceOps for LinuxHal {
    fn devices(&self) -> HalResult<Vec<DeviceRecord>> {
        let entries = block::list_block_entries(&self.roots.sys_class_block_root)?;
        Ok(entries
            .into_iter()
            .map(|entry| DeviceRecord {
                node: self.roots.dev_root.join(&entry.devname),
                name: entry.name,
            })
            .collect())
    }

    fn whole_disk(&self, devno: DevId) -> HalResult<WholeDisk> {
        let disk = block::whole_disk_of(&self.roots.sys_dev_block_root, devno)?;
        Ok(WholeDisk {
            devno: disk.devno,
            node: self.roots.dev_root.join(&disk.devname),
            name: disk.name,
        })
    }
}

impl StatOps for LinuxHal {
    fn stat(&self, path: &Path) -> HalResult<NodeStat> {
        let st = nix::sys::stat::stat(path)?;
        Ok(NodeStat {
            kind: NodeKind::from_mode(st.st_mode),
            dev: DevId::new(st.st_dev),
            rdev: DevId::new(st.st_rdev),
        })
    }
}

impl RotationalOps for LinuxHal {
    fn rotational(&self, device: &str) -> Rotational {
        block::probe_rotational(&self.roots.sys_block_root, device)
    }
}
