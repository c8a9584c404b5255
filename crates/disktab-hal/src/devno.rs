//! Device numbers (`dev_t`) as a small copyable value type.

use crate::{HalError, HalResult};
use nix::libc::dev_t;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An OS device number identifying a partition or a whole disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DevId(u64);

impl DevId {
    /// Device number zero, returned when a lookup finds no disk.
    pub const NONE: DevId = DevId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn from_parts(major: u64, minor: u64) -> Self {
        Self(nix::sys::stat::makedev(major, minor) as u64)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub fn major(self) -> u64 {
        nix::sys::stat::major(self.0 as dev_t)
    }

    pub fn minor(self) -> u64 {
        nix::sys::stat::minor(self.0 as dev_t)
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// The `MAJ:MIN` name used for entries under `/sys/dev/block`.
    pub fn sysfs_name(self) -> String {
        format!("{}:{}", self.major(), self.minor())
    }
}

impl From<u64> for DevId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DevId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.major(), self.minor())
    }
}

/// Parses the `MAJ:MIN` form found in sysfs `dev` attributes.
impl FromStr for DevId {
    type Err = HalError;

    fn from_str(s: &str) -> HalResult<Self> {
        let (major, minor) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| HalError::Parse(format!("invalid device number {s:?}")))?;
        let major = major
            .parse::<u64>()
            .map_err(|e| HalError::Parse(format!("invalid major {major:?}: {e}")))?;
        let minor = minor
            .parse::<u64>()
            .map_err(|e| HalError::Parse(format!("invalid minor {minor:?}: {e}")))?;
        Ok(Self::from_parts(major, minor))
    }
}
