//! Helpers related to block devices in sysfs.

use crate::{DevId, HalError, HalResult};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Attribute below `/sys/block/<dev>` holding the rotational flag.
pub const ROTATIONAL_ATTR: &str = "queue/rotational";

/// Seek behaviour of a whole disk as reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotational {
    Rotational,
    NonRotational,
    Unknown,
}

impl Rotational {
    /// Classifies the contents of a `queue/rotational` file by its first byte.
    pub fn from_contents(contents: &[u8]) -> Self {
        match contents.first() {
            Some(b'0') => Self::NonRotational,
            Some(b'1') => Self::Rotational,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rotational => "rotational",
            Self::NonRotational => "non-rotational",
            Self::Unknown => "unknown",
        }
    }
}

pub fn device_basename(path: &Path) -> HalResult<String> {
    let name = path
        .file_name()
        .ok_or_else(|| HalError::Parse(format!("invalid device path {}", path.display())))?
        .to_string_lossy()
        .to_string();
    Ok(name)
}

/// Reads `<sys_block_root>/<dev>/queue/rotational`.
///
/// `device` may be a bare name (`sda`) or a node path (`/dev/sda`).
pub fn read_rotational_flag(sys_block_root: &Path, device: &str) -> HalResult<Rotational> {
    let name = device_basename(Path::new(device))?;
    let file = fs::File::open(sys_block_root.join(&name).join(ROTATIONAL_ATTR))?;
    let mut flag = Vec::with_capacity(1);
    file.take(1).read_to_end(&mut flag)?;
    match Rotational::from_contents(&flag) {
        Rotational::Unknown => Err(HalError::ProbeUnavailable(name)),
        known => Ok(known),
    }
}

/// Best-effort variant of [`read_rotational_flag`]: any failure is `Unknown`.
pub fn probe_rotational(sys_block_root: &Path, device: &str) -> Rotational {
    match read_rotational_flag(sys_block_root, device) {
        Ok(flag) => flag,
        Err(err) => {
            log::debug!("rotational probe for {device}: {err}");
            Rotational::Unknown
        }
    }
}

/// Reads the `dev` attribute (`MAJ:MIN`) of a sysfs device directory.
pub fn read_dev_attr(sysfs_dev_dir: &Path) -> HalResult<DevId> {
    fs::read_to_string(sysfs_dev_dir.join("dev"))?.parse()
}

/// Returns the `DEVNAME=` value of a sysfs `uevent` file, if any.
pub fn read_uevent_devname(sysfs_dev_dir: &Path) -> Option<String> {
    let uevent = fs::read_to_string(sysfs_dev_dir.join("uevent")).ok()?;
    uevent
        .lines()
        .find_map(|line| line.strip_prefix("DEVNAME="))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    /// Name of the entry under `/sys/class/block`, e.g. `sda1`.
    pub name: String,
    /// Node name relative to `/dev`, e.g. `sda1` or `mapper/root`.
    pub devname: String,
    pub sysfs_path: PathBuf,
}

/// Lists every block device (disks and partitions) under `/sys/class/block`.
///
/// A missing root means sysfs is not there to ask, which is reported as
/// [`HalError::EnumerationUnavailable`].
pub fn list_block_entries(sys_class_block_root: &Path) -> HalResult<Vec<BlockEntry>> {
    let entries = fs::read_dir(sys_class_block_root).map_err(|e| {
        HalError::EnumerationUnavailable(format!("{}: {e}", sys_class_block_root.display()))
    })?;

    let mut out: Vec<BlockEntry> = entries
        .flatten()
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let sysfs_path = sys_class_block_root.join(&name);
            let devname =
                read_uevent_devname(&sysfs_path).unwrap_or_else(|| name.replace('!', "/"));
            BlockEntry {
                name,
                devname,
                sysfs_path,
            }
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

/// A whole disk as found in sysfs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsDisk {
    pub devno: DevId,
    /// Name under `/sys/block`.
    pub name: String,
    /// Node name relative to `/dev`.
    pub devname: String,
}

/// Resolves a device number to the whole disk containing it.
///
/// `<sys_dev_block_root>/MAJ:MIN` links to the device's sysfs directory.
/// Partitions carry a `partition` attribute and sit inside their disk's
/// directory; anything else is its own whole disk.
pub fn whole_disk_of(sys_dev_block_root: &Path, devno: DevId) -> HalResult<SysfsDisk> {
    let link = sys_dev_block_root.join(devno.sysfs_name());
    let dir = fs::canonicalize(&link)?;
    let disk_dir = if dir.join("partition").exists() {
        dir.parent()
            .ok_or_else(|| HalError::NoWholeDisk(devno.to_string()))?
            .to_path_buf()
    } else {
        dir
    };

    let disk_devno = read_dev_attr(&disk_dir)?;
    let name = device_basename(&disk_dir)?;
    let devname = read_uevent_devname(&disk_dir).unwrap_or_else(|| name.replace('!', "/"));
    Ok(SysfsDisk {
        devno: disk_devno,
        name,
        devname,
    })
}
