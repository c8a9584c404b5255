//! Fake HAL implementation for testing.
//!
//! This implementation serves a scripted device tree and records every
//! operation, allowing CI-safe testing without real block devices.

use super::{DeviceOps, DeviceRecord, NodeKind, NodeStat, RotationalOps, StatOps, WholeDisk};
use crate::{DevId, HalError, HalResult, Rotational};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Devices,
    Stat { path: PathBuf },
    WholeDisk { devno: DevId },
    ProbeRotational { device: String },
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Whether `devices()` answers at all
    available: bool,
    devices: Vec<DeviceRecord>,
    stats: HashMap<PathBuf, NodeStat>,
    whole_disks: HashMap<DevId, WholeDisk>,
    /// Raw `queue/rotational` contents per disk name
    rotational: HashMap<String, Vec<u8>>,
}

impl Default for FakeHalState {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
            available: true,
            devices: Vec::new(),
            stats: HashMap::new(),
            whole_disks: HashMap::new(),
            rotational: HashMap::new(),
        }
    }
}

/// Fake HAL implementation that answers from an in-memory device tree.
///
/// Clones share state, so a test can keep a handle for assertions after
/// handing one to the table builder.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A HAL whose enumeration service is missing.
    pub fn unavailable() -> Self {
        let hal = Self::new();
        hal.lock().available = false;
        hal
    }

    fn lock(&self) -> MutexGuard<'_, FakeHalState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a whole disk node that is its own whole disk.
    pub fn add_disk(&self, node: &str, devno: DevId) -> &Self {
        let disk = whole_disk_for(node, devno);
        self.add_device(node, block_stat(devno), disk)
    }

    /// Register a partition node living on `disk_node`.
    pub fn add_partition(
        &self,
        node: &str,
        devno: DevId,
        disk_node: &str,
        disk_devno: DevId,
    ) -> &Self {
        let disk = whole_disk_for(disk_node, disk_devno);
        self.lock().whole_disks.insert(disk_devno, disk.clone());
        self.add_device(node, block_stat(devno), disk)
    }

    /// Register an arbitrary enumeration record with its stat result and whole disk.
    pub fn add_device(&self, node: &str, stat: NodeStat, disk: WholeDisk) -> &Self {
        let node = PathBuf::from(node);
        let name = node
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut state = self.lock();
        state.devices.push(DeviceRecord {
            name,
            node: node.clone(),
        });
        state.whole_disks.insert(stat.rdev, disk);
        state.stats.insert(node, stat);
        self
    }

    /// Register an enumeration record whose node cannot be statted.
    pub fn add_stale_device(&self, node: &str) -> &Self {
        let node = PathBuf::from(node);
        let name = node
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.lock().devices.push(DeviceRecord { name, node });
        self
    }

    /// Forget the whole disk of `devno`, making its resolution fail.
    pub fn remove_whole_disk(&self, devno: DevId) -> &Self {
        self.lock().whole_disks.remove(&devno);
        self
    }

    /// Set the raw contents of `<disk>/queue/rotational`.
    pub fn set_rotational_flag(&self, disk_name: &str, contents: &[u8]) -> &Self {
        self.lock()
            .rotational
            .insert(disk_name.to_string(), contents.to_vec());
        self
    }

    /// Make `path` a regular file on device `dev`.
    pub fn add_path(&self, path: &str, dev: DevId) -> &Self {
        self.set_stat(
            path,
            NodeStat {
                kind: NodeKind::Regular,
                dev,
                rdev: DevId::NONE,
            },
        )
    }

    pub fn set_stat(&self, path: &str, stat: NodeStat) -> &Self {
        self.lock().stats.insert(PathBuf::from(path), stat);
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.lock().operations.len()
    }

    /// Count recorded operations matching `check`.
    pub fn count_operations(&self, check: impl Fn(&Operation) -> bool) -> usize {
        self.lock().operations.iter().filter(|op| check(op)).count()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.lock().operations.iter().any(check)
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.lock().operations.clear();
    }

    fn record_operation(&self, op: Operation) {
        self.lock().operations.push(op);
    }
}

fn whole_disk_for(node: &str, devno: DevId) -> WholeDisk {
    let node = PathBuf::from(node);
    let name = node
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    WholeDisk { devno, name, node }
}

fn block_stat(rdev: DevId) -> NodeStat {
    NodeStat {
        kind: NodeKind::Block,
        // device nodes live on devtmpfs
        dev: DevId::from_parts(0, 5),
        rdev,
    }
}

impl DeviceOps for FakeHal {
    fn devices(&self) -> HalResult<Vec<DeviceRecord>> {
        self.record_operation(Operation::Devices);
        let state = self.lock();
        if !state.available {
            log::info!("FAKE HAL: enumeration unavailable");
            return Err(HalError::EnumerationUnavailable(
                "fake enumeration disabled".to_string(),
            ));
        }
        log::info!("FAKE HAL: {} devices", state.devices.len());
        Ok(state.devices.clone())
    }

    fn whole_disk(&self, devno: DevId) -> HalResult<WholeDisk> {
        self.record_operation(Operation::WholeDisk { devno });
        self.lock()
            .whole_disks
            .get(&devno)
            .cloned()
            .ok_or_else(|| HalError::NoWholeDisk(devno.to_string()))
    }
}

impl StatOps for FakeHal {
    fn stat(&self, path: &Path) -> HalResult<NodeStat> {
        self.record_operation(Operation::Stat {
            path: path.to_path_buf(),
        });
        self.lock()
            .stats
            .get(path)
            .copied()
            .ok_or(HalError::Nix(nix::errno::Errno::ENOENT))
    }
}

impl RotationalOps for FakeHal {
    fn rotational(&self, device: &str) -> Rotational {
        self.record_operation(Operation::ProbeRotational {
            device: device.to_string(),
        });
        let flag = self
            .lock()
            .rotational
            .get(device)
            .map(|contents| Rotational::from_contents(contents))
            .unwrap_or(Rotational::Unknown);
        log::info!("FAKE HAL: {device} is {}", flag.label());
        flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_resolve_to_their_disk() {
        let hal = FakeHal::new();
        hal.add_partition("/dev/sda1", DevId::new(2049), "/dev/sda", DevId::new(2048));

        let devices = hal.devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "sda1");

        let st = hal.stat(Path::new("/dev/sda1")).unwrap();
        assert_eq!(st.kind, NodeKind::Block);
        assert_eq!(st.rdev, DevId::new(2049));

        let disk = hal.whole_disk(st.rdev).unwrap();
        assert_eq!(disk.devno, DevId::new(2048));
        assert_eq!(disk.name, "sda");
        assert_eq!(hal.whole_disk(DevId::new(2048)).unwrap(), disk);
    }

    #[test]
    fn records_operations_and_clears() {
        let hal = FakeHal::new();
        hal.set_rotational_flag("sda", b"1");
        assert_eq!(hal.rotational("sda"), Rotational::Rotational);
        assert_eq!(hal.rotational("sdb"), Rotational::Unknown);
        assert!(hal.stat(Path::new("/missing")).is_err());
        assert_eq!(hal.operation_count(), 3);
        assert!(hal.has_operation(|op| matches!(
            op,
            Operation::ProbeRotational { device } if device == "sdb"
        )));
        hal.clear();
        assert_eq!(hal.operation_count(), 0);
    }

    #[test]
    fn unavailable_rejects_enumeration() {
        let hal = FakeHal::unavailable();
        assert!(matches!(
            hal.devices(),
            Err(HalError::EnumerationUnavailable(_))
        ));
        assert_eq!(hal.operations(), vec![Operation::Devices]);
    }

    #[test]
    fn clones_share_state() {
        let hal = FakeHal::new();
        let other = hal.clone();
        other.add_path("/data/file", DevId::new(2049));
        assert_eq!(
            hal.stat(Path::new("/data/file")).unwrap().dev,
            DevId::new(2049)
        );
    }
}
