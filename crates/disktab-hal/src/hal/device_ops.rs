//! Device enumeration operations.

use crate::{DevId, HalResult};
use std::path::PathBuf;

/// One entry of the enumeration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Name the enumeration service knows the device by (`sda1`).
    pub name: String,
    /// Canonical device node (`/dev/sda1`).
    pub node: PathBuf,
}

/// The whole disk that contains some device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WholeDisk {
    pub devno: DevId,
    /// Name used for the rotational attribute lookup (`sda`).
    pub name: String,
    /// Canonical device node (`/dev/sda`).
    pub node: PathBuf,
}

/// Enumeration service trait.
pub trait DeviceOps {
    /// Snapshot of every known device.
    ///
    /// Fails with [`crate::HalError::EnumerationUnavailable`] when the
    /// service cannot be queried at all.
    fn devices(&self) -> HalResult<Vec<DeviceRecord>>;

    /// Resolve a device number to the whole disk containing it.
    fn whole_disk(&self, devno: DevId) -> HalResult<WholeDisk>;
}
