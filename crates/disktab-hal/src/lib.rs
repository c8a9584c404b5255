//! disktab Hardware Abstraction Layer (HAL).
//!
//! Everything that touches the running system lives here: sysfs parsing,
//! `stat(2)` and the rotational flag probe. The table logic in `disktab`
//! only sees the traits in [`hal`], so it can run against [`FakeHal`] in tests.

pub mod devno;
pub mod hal;
pub mod sysfs;

pub use devno::DevId;
pub use disktab_error::{HalError, HalResult};
pub use hal::{
    DeviceOps, DeviceRecord, FakeHal, LinuxHal, NodeKind, NodeStat, Operation, RotationalOps,
    StatOps, SysfsRoots, SystemHal, WholeDisk,
};
pub use sysfs::block::Rotational;
