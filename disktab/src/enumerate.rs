//! Builds the partition and rotational maps from one device snapshot.

use disktab_hal::{DevId, DeviceRecord, Rotational, SystemHal};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Partition (or whole disk) device number to whole disk device number.
pub type PartitionMap = HashMap<DevId, DevId>;

/// Whole disk device number to "is non-rotational".
pub type RotationalMap = HashMap<DevId, bool>;

/// Whether the enumeration service answered when the table was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumerationMode {
    Available,
    /// No service: unknown devices are treated as their own disk.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub mode: EnumerationMode,
    pub partitions: PartitionMap,
    pub nonrotational: RotationalMap,
}

impl Enumeration {
    pub fn unavailable() -> Self {
        Self {
            mode: EnumerationMode::Unavailable,
            partitions: PartitionMap::new(),
            nonrotational: RotationalMap::new(),
        }
    }

    fn available() -> Self {
        Self {
            mode: EnumerationMode::Available,
            ..Self::unavailable()
        }
    }
}

pub struct DeviceEnumerator<'a, H: ?Sized> {
    hal: &'a H,
}

impl<'a, H: SystemHal + ?Sized> DeviceEnumerator<'a, H> {
    pub fn new(hal: &'a H) -> Self {
        Self { hal }
    }

    /// Walk every device once, mapping it to its whole disk and probing each
    /// whole disk at most once.
    ///
    /// Records that cannot be resolved are skipped; a missing enumeration
    /// service yields empty maps in [`EnumerationMode::Unavailable`].
    pub fn enumerate(&self) -> Enumeration {
        let records = match self.hal.devices() {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Device enumeration unavailable, using identity mapping: {err}");
                return Enumeration::unavailable();
            }
        };

        let mut out = Enumeration::available();
        let mut probed = HashSet::new();
        for record in &records {
            self.add_record(record, &mut out, &mut probed);
        }

        log::debug!(
            "Enumerated {} devices: {} mapped, {} disks probed, {} classified",
            records.len(),
            out.partitions.len(),
            probed.len(),
            out.nonrotational.len()
        );
        out
    }

    fn add_record(
        &self,
        record: &DeviceRecord,
        out: &mut Enumeration,
        probed: &mut HashSet<DevId>,
    ) {
        let st = match self.hal.stat(&record.node) {
            Ok(st) => st,
            Err(err) => {
                log::warn!("stat on device {} failed: {err}", record.node.display());
                return;
            }
        };
        if !st.is_device_node() {
            log::debug!("{} is not a device node, skipping", record.node.display());
            return;
        }

        let disk = match self.hal.whole_disk(st.rdev) {
            Ok(disk) => disk,
            Err(err) => {
                log::debug!(
                    "No whole disk for {} ({}): {err}",
                    record.node.display(),
                    st.rdev
                );
                return;
            }
        };

        log::info!(
            "{} {} -> {} {}",
            st.rdev,
            record.node.display(),
            disk.devno,
            disk.node.display()
        );

        out.partitions.insert(st.rdev, disk.devno);
        // The disk itself may be queried too.
        out.partitions.insert(disk.devno, disk.devno);

        if !probed.insert(disk.devno) {
            return;
        }
        let flag = self.hal.rotational(&disk.name);
        log::info!("    {} is {}", disk.node.display(), flag.label());
        if flag.is_known() {
            out.nonrotational
                .insert(disk.devno, flag == Rotational::NonRotational);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disktab_hal::{FakeHal, NodeKind, NodeStat, Operation, WholeDisk};
    use std::path::PathBuf;

    fn sda() -> (DevId, DevId) {
        (DevId::new(2048), DevId::new(2049))
    }

    #[test]
    fn unavailable_service_gives_empty_identity_enumeration() {
        let hal = FakeHal::unavailable();
        let out = DeviceEnumerator::new(&hal).enumerate();
        assert_eq!(out, Enumeration::unavailable());
    }

    #[test]
    fn maps_partition_and_disk_to_disk() {
        let (disk, part) = sda();
        let hal = FakeHal::new();
        hal.add_disk("/dev/sda", disk)
            .add_partition("/dev/sda1", part, "/dev/sda", disk)
            .set_rotational_flag("sda", b"0\n");

        let out = DeviceEnumerator::new(&hal).enumerate();
        assert_eq!(out.mode, EnumerationMode::Available);
        assert_eq!(out.partitions.get(&part), Some(&disk));
        assert_eq!(out.partitions.get(&disk), Some(&disk));
        assert_eq!(out.nonrotational.get(&disk), Some(&true));
    }

    #[test]
    fn unknown_probe_leaves_no_rotational_entry() {
        let (disk, part) = sda();
        let hal = FakeHal::new();
        hal.add_partition("/dev/sda1", part, "/dev/sda", disk)
            .set_rotational_flag("sda", b"?");

        let out = DeviceEnumerator::new(&hal).enumerate();
        assert_eq!(out.partitions.len(), 2);
        assert!(out.nonrotational.is_empty());
    }

    #[test]
    fn skips_stale_non_device_and_unresolvable_records() {
        let (disk, part) = sda();
        let hal = FakeHal::new();
        hal.add_stale_device("/dev/gone")
            .add_device(
                "/dev/notanode",
                NodeStat {
                    kind: NodeKind::Regular,
                    dev: DevId::from_parts(0, 5),
                    rdev: DevId::NONE,
                },
                WholeDisk {
                    devno: DevId::from_parts(9, 0),
                    name: "md0".to_string(),
                    node: PathBuf::from("/dev/md0"),
                },
            )
            .add_partition(
                "/dev/sdb1",
                DevId::from_parts(8, 17),
                "/dev/sdb",
                DevId::from_parts(8, 16),
            )
            .remove_whole_disk(DevId::from_parts(8, 17))
            .add_partition("/dev/sda1", part, "/dev/sda", disk)
            .set_rotational_flag("sda", b"1");

        let out = DeviceEnumerator::new(&hal).enumerate();
        assert_eq!(out.mode, EnumerationMode::Available);
        assert_eq!(out.partitions.len(), 2);
        assert_eq!(out.partitions.get(&part), Some(&disk));
        assert_eq!(out.nonrotational.get(&disk), Some(&false));
        // the regular file never reaches whole-disk resolution
        assert!(!hal.has_operation(|op| matches!(
            op,
            Operation::WholeDisk { devno } if devno.is_none()
        )));
    }

    #[test]
    fn char_devices_are_accepted() {
        let hal = FakeHal::new();
        let disk = WholeDisk {
            devno: DevId::from_parts(21, 0),
            name: "sg0".to_string(),
            node: PathBuf::from("/dev/sg0"),
        };
        hal.add_device(
            "/dev/sg0",
            NodeStat {
                kind: NodeKind::Char,
                dev: DevId::from_parts(0, 5),
                rdev: DevId::from_parts(21, 0),
            },
            disk,
        );
        let out = DeviceEnumerator::new(&hal).enumerate();
        assert_eq!(
            out.partitions.get(&DevId::from_parts(21, 0)),
            Some(&DevId::from_parts(21, 0))
        );
    }
}
