//! The mount table: partition to disk mapping plus rotational classification.
//!
//! Built once from a device snapshot and read-only afterwards, so a shared
//! `&MountTable` can be queried from any number of threads.

use crate::config::TableConfig;
use crate::enumerate::{
    DeviceEnumerator, Enumeration, EnumerationMode, PartitionMap, RotationalMap,
};
use disktab_error::{TableError, TableResult};
use disktab_hal::{DevId, LinuxHal, Rotational, StatOps, SystemHal};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a path lives and how it should be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub path: PathBuf,
    /// Device holding the path (`st_dev`).
    pub device: DevId,
    pub disk: DevId,
    pub non_rotational: bool,
}

pub struct MountTable {
    mode: EnumerationMode,
    partitions: PartitionMap,
    nonrotational: RotationalMap,
    stat: Box<dyn StatOps + Send + Sync>,
}

impl fmt::Debug for MountTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountTable")
            .field("mode", &self.mode)
            .field("partitions", &self.partitions)
            .field("nonrotational", &self.nonrotational)
            .finish_non_exhaustive()
    }
}

impl MountTable {
    /// Build from the running system with default sysfs locations.
    pub fn build() -> Self {
        Self::build_with(LinuxHal::new())
    }

    pub fn from_config(cfg: &TableConfig) -> Self {
        let hal = LinuxHal::with_roots(cfg.sysfs_roots());
        if cfg.enumerate {
            Self::build_with(hal)
        } else {
            log::info!("Device enumeration disabled, using identity mapping");
            Self::identity_with(hal)
        }
    }

    /// Build through `hal`, which is kept for path lookups.
    pub fn build_with<H: SystemHal + 'static>(hal: H) -> Self {
        let enumeration = DeviceEnumerator::new(&hal).enumerate();
        Self::from_enumeration(enumeration, hal)
    }

    /// A table that skips enumeration entirely, as if no service existed.
    pub fn identity_with<H: StatOps + Send + Sync + 'static>(hal: H) -> Self {
        Self::from_enumeration(Enumeration::unavailable(), hal)
    }

    fn from_enumeration<H>(enumeration: Enumeration, hal: H) -> Self
    where
        H: StatOps + Send + Sync + 'static,
    {
        Self {
            mode: enumeration.mode,
            partitions: enumeration.partitions,
            nonrotational: enumeration.nonrotational,
            stat: Box::new(hal),
        }
    }

    pub fn mode(&self) -> EnumerationMode {
        self.mode
    }

    /// Whole disk of a partition or disk device number.
    ///
    /// Unknown numbers map to themselves when enumeration was unavailable and
    /// to [`DevId::NONE`] when enumeration ran but never saw them.
    pub fn disk_id(&self, partition: DevId) -> DevId {
        match self.partitions.get(&partition) {
            Some(disk) => *disk,
            None => match self.mode {
                EnumerationMode::Unavailable => partition,
                EnumerationMode::Available => DevId::NONE,
            },
        }
    }

    pub fn disk_id_by_path(&self, path: &Path) -> TableResult<DevId> {
        Ok(self.disk_id(self.path_device(path)?))
    }

    /// True only for disks known to be non-rotational; unknown is rotational.
    pub fn is_nonrotational(&self, device: DevId) -> bool {
        self.nonrotational
            .get(&self.disk_id(device))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_nonrotational_by_path(&self, path: &Path) -> TableResult<bool> {
        Ok(self.is_nonrotational(self.path_device(path)?))
    }

    pub fn classify_path(&self, path: &Path) -> TableResult<PathReport> {
        let device = self.path_device(path)?;
        Ok(PathReport {
            path: path.to_path_buf(),
            device,
            disk: self.disk_id(device),
            non_rotational: self.is_nonrotational(device),
        })
    }

    /// Every `(device, disk)` pair, sorted by device number.
    pub fn partitions(&self) -> Vec<(DevId, DevId)> {
        let mut out: Vec<_> = self.partitions.iter().map(|(p, d)| (*p, *d)).collect();
        out.sort();
        out
    }

    /// Every distinct whole disk with its classification.
    pub fn disks(&self) -> Vec<(DevId, Rotational)> {
        let disks: BTreeMap<DevId, Rotational> = self
            .partitions
            .values()
            .map(|disk| {
                let flag = match self.nonrotational.get(disk) {
                    Some(true) => Rotational::NonRotational,
                    Some(false) => Rotational::Rotational,
                    None => Rotational::Unknown,
                };
                (*disk, flag)
            })
            .collect();
        disks.into_iter().collect()
    }

    /// Release both maps. The table cannot be queried afterwards.
    pub fn destroy(self) {
        log::debug!(
            "Releasing mount table ({} devices, {} classified disks)",
            self.partitions.len(),
            self.nonrotational.len()
        );
    }

    fn path_device(&self, path: &Path) -> TableResult<DevId> {
        self.stat
            .stat(path)
            .map(|st| st.dev)
            .map_err(|source| TableError::PathNotFound {
                path: path.to_path_buf(),
                source,
            })
    }
}
