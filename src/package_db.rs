//! Package database snapshots
//!
//! Adapters that turn the host's package database into [`PackageRecord`]s
//! for the resolver. The resolver never queries anything itself; a snapshot
//! is taken once here and passed in whole.
//!
//! Supported sources:
//!
//! - Live `dpkg-query` on the running system
//! - Saved `dpkg-query` output (same format, read from a file)
//! - JSON snapshot: `[{"name": ..., "source": ..., "installed": ...}]`

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{KernelMetaError, Result};
use crate::types::PackageRecord;

/// Output format passed to `dpkg-query -f`
pub const DPKG_QUERY_FORMAT: &str = "${Package}\t${Source}\t${db:Status-Abbrev}\n";

/// Current-state letters from `db:Status-Abbrev` that mean the package is on disk
const INSTALLED_STATES: &[char] = &['i', 'U', 'F', 'W', 't'];

/// Parse one `${db:Status-Abbrev}` value (`ii `, `rc `, `in `).
///
/// Installed means either installed now or selected for install.
fn is_installed(status: &str) -> Option<bool> {
    let mut chars = status.chars();
    let want = chars.next()?;
    let state = chars.next()?;
    Some(want == 'i' || INSTALLED_STATES.contains(&state))
}

/// Parse `dpkg-query` output produced with [`DPKG_QUERY_FORMAT`].
///
/// Malformed lines are skipped with a warning.
pub fn parse_dpkg_query_output(stdout: &str) -> Vec<PackageRecord> {
    let mut packages = Vec::new();

    for (index, line) in stdout.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let (name, source, status) = match fields.as_slice() {
            [name, source, status] => (name.trim(), source.trim(), status),
            _ => {
                warn!(line = index + 1, "malformed dpkg-query line: {:?}", line);
                continue;
            }
        };

        let Some(installed) = is_installed(status) else {
            warn!(line = index + 1, package = name, "missing package status");
            continue;
        };

        if name.is_empty() {
            warn!(line = index + 1, "dpkg-query line without package name");
            continue;
        }

        packages.push(PackageRecord {
            name: name.to_string(),
            source: (!source.is_empty()).then(|| source.to_string()),
            installed,
        });
    }

    packages
}

/// Query the live package database with `dpkg-query`.
pub fn query_dpkg() -> Result<Vec<PackageRecord>> {
    let output = Command::new("dpkg-query")
        .args(["-W", "-f", DPKG_QUERY_FORMAT])
        .output()
        .map_err(|e| KernelMetaError::query(format!("Failed to run dpkg-query: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(KernelMetaError::query(format!(
            "dpkg-query exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let packages = parse_dpkg_query_output(&stdout);
    debug!(count = packages.len(), "read package database");
    Ok(packages)
}

/// Load saved `dpkg-query` output from a file.
pub fn load_dpkg_output<P: AsRef<Path>>(path: P) -> Result<Vec<PackageRecord>> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(parse_dpkg_query_output(&content))
}

/// Load a JSON snapshot from a file.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<PackageRecord>> {
    let content = fs::read_to_string(path.as_ref())?;
    let packages: Vec<PackageRecord> = serde_json::from_str(&content)?;
    Ok(packages)
}

/// Write a JSON snapshot to a file.
pub fn save_snapshot<P: AsRef<Path>>(path: P, packages: &[PackageRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(packages)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "linux-image-3.5.0-18-generic\tlinux-lts-quantal\tii \n\
                          linux-image-generic\tlinux-meta\tii \n\
                          linux-image-3.2.0-23-generic\tlinux\trc \n\
                          xserver-xorg-core\txorg-server\thi \n\
                          linux-headers-3.5.0-18\t\tin \n";

    #[test]
    fn test_parse_dpkg_query_output() {
        let packages = parse_dpkg_query_output(SAMPLE);
        assert_eq!(packages.len(), 5);

        assert_eq!(
            packages[0],
            PackageRecord::installed("linux-image-3.5.0-18-generic", Some("linux-lts-quantal"))
        );
        assert!(!packages[2].installed, "rc means removed, config files left");
        assert!(packages[3].installed, "held packages are still installed");
        assert!(packages[4].installed, "selected for install counts");
        assert_eq!(packages[4].source, None);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let packages = parse_dpkg_query_output("garbage line\n\nlinux-image-generic\tlinux-meta\n\tlinux\tii \n");
        assert!(packages.is_empty());
    }

    #[test]
    fn test_parse_half_configured_is_installed() {
        let packages = parse_dpkg_query_output("linux-image-3.8.0-0-lowlatency\tlinux-lowlatency\tiF \n");
        assert!(packages[0].installed);

        let packages = parse_dpkg_query_output("linux-image-3.8.0-0-lowlatency\tlinux-lowlatency\tpn \n");
        assert!(!packages[0].installed);
    }

    #[test]
    fn test_source_with_version_is_kept_raw() {
        let packages = parse_dpkg_query_output("linux-image-3.5.0-18-generic\tlinux (3.5.0-18.29)\tii \n");
        assert_eq!(packages[0].source.as_deref(), Some("linux (3.5.0-18.29)"));
        assert_eq!(packages[0].source_name(), Some("linux"));
    }

    #[test]
    fn test_load_dpkg_output_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let packages = load_dpkg_output(temp_file.path()).unwrap();
        assert_eq!(packages.len(), 5);
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let packages = vec![
            PackageRecord::installed("linux-image-3.8.0-3-powerpc-e500", Some("linux-ppc")),
            PackageRecord::available("linux-image-powerpc-smp", None),
        ];
        let temp_file = NamedTempFile::new().unwrap();
        save_snapshot(temp_file.path(), &packages).unwrap();

        let loaded = load_snapshot(temp_file.path()).unwrap();
        assert_eq!(loaded, packages);
    }

    #[test]
    fn test_load_snapshot_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[{ \"name\": }]").unwrap();
        temp_file.flush().unwrap();

        let result = load_snapshot(temp_file.path());
        assert!(matches!(result, Err(KernelMetaError::Json(_))));
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let result = load_snapshot("/nonexistent/snapshot.json");
        assert!(matches!(result, Err(KernelMetaError::Io(_))));
    }
}
