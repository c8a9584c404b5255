//! Text and JSON rendering for the CLI.

use crate::table::{MountTable, PathReport};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

pub fn format_report(report: &PathReport) -> String {
    format!(
        "{:>30} is on {:>4}rotational device and on disk {}",
        report.path.display().to_string(),
        if report.non_rotational { "non-" } else { "" },
        report.disk
    )
}

/// Writes the partition and disk tables.
pub fn write_listing(out: &mut impl Write, table: &MountTable) -> Result<()> {
    writeln!(out, "mode: {:?}", table.mode())?;
    writeln!(out, "partitions:")?;
    for (device, disk) in table.partitions() {
        writeln!(out, "  {device} -> {disk}")?;
    }
    writeln!(out, "disks:")?;
    for (disk, flag) in table.disks() {
        writeln!(out, "  {disk} {}", flag.label())?;
    }
    Ok(())
}

/// Classifies each path and writes the results.
///
/// Paths that cannot be resolved are logged and returned so the caller can
/// decide the exit status.
pub fn write_reports(
    out: &mut impl Write,
    table: &MountTable,
    paths: &[PathBuf],
    json: bool,
) -> Result<Vec<PathBuf>> {
    let mut reports = Vec::new();
    let mut failed = Vec::new();
    for path in paths {
        match table.classify_path(path) {
            Ok(report) => reports.push(report),
            Err(err) => {
                log::error!("{err}");
                failed.push(path.clone());
            }
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
    } else {
        for report in &reports {
            writeln!(out, "{}", format_report(report))?;
        }
    }
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use disktab_hal::{DevId, FakeHal};
    use std::path::Path;

    fn table() -> MountTable {
        let hal = FakeHal::new();
        hal.add_partition("/dev/sda1", DevId::new(2049), "/dev/sda", DevId::new(2048))
            .set_rotational_flag("sda", b"0")
            .add_path("/srv", DevId::new(2049));
        MountTable::build_with(hal)
    }

    #[test]
    fn text_report_matches_classic_layout() {
        let report = table().classify_path(Path::new("/srv")).unwrap();
        assert_eq!(
            format_report(&report),
            format!("{:>30} is on non-rotational device and on disk 08:00", "/srv")
        );
    }

    #[test]
    fn write_reports_collects_failures() {
        let mut out = Vec::new();
        let failed = write_reports(
            &mut out,
            &table(),
            &[PathBuf::from("/srv"), PathBuf::from("/nonexistent")],
            false,
        )
        .unwrap();
        assert_eq!(failed, vec![PathBuf::from("/nonexistent")]);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("non-rotational"));
    }

    #[test]
    fn json_reports_are_an_array() {
        let mut out = Vec::new();
        write_reports(&mut out, &table(), &[PathBuf::from("/srv")], true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["path"], "/srv");
        assert_eq!(value[0]["disk"], 2048);
        assert_eq!(value[0]["non_rotational"], true);
    }

    #[test]
    fn listing_shows_both_tables() {
        let mut out = Vec::new();
        write_listing(&mut out, &table()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("08:01 -> 08:00"));
        assert!(text.contains("08:00 non-rotational"));
        assert!(text.starts_with("mode: Available"));
    }
}
