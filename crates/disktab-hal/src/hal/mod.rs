//! HAL trait definitions and implementations.
//!
//! This module defines the core traits the device table is built through and
//! provides both real (LinuxHal) and fake (FakeHal) implementations.

pub mod device_ops;
pub mod fake_hal;
pub mod linux_hal;
pub mod probe_ops;
pub mod stat_ops;

pub use device_ops::{DeviceOps, DeviceRecord, WholeDisk};
pub use fake_hal::{FakeHal, Operation};
pub use linux_hal::{LinuxHal, SysfsRoots};
pub use probe_ops::RotationalOps;
pub use stat_ops::{NodeKind, NodeStat, StatOps};

/// Complete HAL combining all system operation traits.
pub trait SystemHal: DeviceOps + StatOps + RotationalOps + Send + Sync {}

/// Automatically implement SystemHal for any type implementing all required traits.
impl<T> SystemHal for T where T: DeviceOps + StatOps + RotationalOps + Send + Sync {}
