//! Package fact extraction
//!
//! Turns raw package records into [`InstalledPackageFact`]s. Only installed
//! `linux-image-*` / `linux-headers-*` packages produce facts; everything
//! else is dropped here so later stages never see a malformed name.
//!
//! # Parsing
//!
//! | Name                                   | Version    | Flavour          |
//! |----------------------------------------|------------|------------------|
//! | `linux-image-3.5.0-18-generic`         | `3.5.0-18` | `generic`        |
//! | `linux-image-3.2.0-36-lowlatency-pae`  | `3.2.0-36` | `lowlatency-pae` |
//! | `linux-image-generic-lts-quantal`      | none       | `generic-lts-quantal` |
//! | `linux-image-686-pae`                  | none       | `686-pae`        |
//! | `linux-headers-3.5.0-19`               | discarded (no flavour)        |

use regex::Regex;
use std::sync::LazyLock;
use strum::Display;
use tracing::debug;

use crate::types::{InstalledPackageFact, PackageFamily, PackageRecord};
use crate::version::KernelVersion;

/// Leading dotted `N.N(.N)*` run with an optional `-N` ABI number, then the
/// flavour. An undotted number (`686-pae`) is part of a meta alias flavour.
static VERSIONED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<version>\d+(?:\.\d+)+(?:-\d+)?)(?:-(?P<flavour>.+))?$")
        .expect("versioned kernel name pattern is valid")
});

/// Why a record did not become a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SkipReason {
    /// Not a package of any requested family
    OtherPackage,
    /// Known to the package database but not installed
    NotInstalled,
    /// Add-on package such as `linux-image-extra-*`
    AddOn,
    /// Kernel-family name without a usable flavour
    NoFlavour,
}

impl SkipReason {
    /// Whether the caller should treat this as a data anomaly worth logging
    pub fn is_anomaly(&self) -> bool {
        matches!(self, Self::NoFlavour)
    }
}

/// A kernel-family package that was left out of resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub reason: SkipReason,
}

/// Facts extracted from one snapshot, plus what was left out and why.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub facts: Vec<InstalledPackageFact>,
    pub skipped: Vec<Skipped>,
}

/// Split the part of a package name after its family prefix.
///
/// Returns `None` when no flavour can be found.
pub fn parse_suffix(suffix: &str) -> Option<(Option<KernelVersion>, String)> {
    if suffix.is_empty() {
        return None;
    }

    match VERSIONED_NAME.captures(suffix) {
        Some(caps) => {
            let flavour = caps.name("flavour")?.as_str();
            let version = KernelVersion::new(&caps["version"]);
            Some((Some(version), flavour.to_string()))
        }
        // Meta alias: the whole remainder is the flavour
        None => Some((None, suffix.to_string())),
    }
}

/// Build a fact for one record against one package family.
pub fn extract_fact(
    record: &PackageRecord,
    family: PackageFamily,
    ignored_markers: &[String],
) -> Result<InstalledPackageFact, SkipReason> {
    let suffix = record
        .name
        .strip_prefix(family.package_prefix())
        .ok_or(SkipReason::OtherPackage)?;

    if !record.installed {
        return Err(SkipReason::NotInstalled);
    }

    if suffix
        .split('-')
        .any(|segment| ignored_markers.iter().any(|m| m == segment))
    {
        return Err(SkipReason::AddOn);
    }

    let (version, flavour) = parse_suffix(suffix).ok_or(SkipReason::NoFlavour)?;

    Ok(InstalledPackageFact {
        name: record.name.clone(),
        version,
        source_package: record.source_name().map(str::to_string),
        flavour,
        family,
    })
}

/// Extract facts for every record that belongs to one of `families`.
///
/// Never fails: unusable records are reported in [`Extraction::skipped`].
pub fn extract_facts(
    records: &[PackageRecord],
    families: &[PackageFamily],
    ignored_markers: &[String],
) -> Extraction {
    let mut extraction = Extraction::default();

    for record in records {
        let Some(family) = families
            .iter()
            .copied()
            .find(|f| record.name.starts_with(f.package_prefix()))
        else {
            continue;
        };

        match extract_fact(record, family, ignored_markers) {
            Ok(fact) => extraction.facts.push(fact),
            Err(SkipReason::OtherPackage) => {}
            Err(reason) => {
                if reason.is_anomaly() {
                    debug!(package = %record.name, %reason, "skipping unparseable kernel package");
                }
                extraction.skipped.push(Skipped {
                    name: record.name.clone(),
                    reason,
                });
            }
        }
    }

    extraction
}
