//! Filesystem status lookups.

use crate::{DevId, HalResult};
use nix::libc::mode_t;
use nix::sys::stat::SFlag;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Block,
    Char,
    Directory,
    Regular,
    Other,
}

impl NodeKind {
    pub fn from_mode(mode: mode_t) -> Self {
        let fmt = mode & SFlag::S_IFMT.bits();
        if fmt == SFlag::S_IFBLK.bits() {
            Self::Block
        } else if fmt == SFlag::S_IFCHR.bits() {
            Self::Char
        } else if fmt == SFlag::S_IFDIR.bits() {
            Self::Directory
        } else if fmt == SFlag::S_IFREG.bits() {
            Self::Regular
        } else {
            Self::Other
        }
    }
}

/// The parts of `struct stat` the device table cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    pub kind: NodeKind,
    /// Device holding the entry (`st_dev`).
    pub dev: DevId,
    /// Device the node stands for, when it is a device node (`st_rdev`).
    pub rdev: DevId,
}

impl NodeStat {
    pub fn is_device_node(&self) -> bool {
        matches!(self.kind, NodeKind::Block | NodeKind::Char)
    }
}

pub trait StatOps {
    /// `stat(2)` following symlinks.
    fn stat(&self, path: &Path) -> HalResult<NodeStat>;
}
