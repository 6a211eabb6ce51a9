//! Kernel metapackage resolver
//!
//! Runs extraction, classification, ranking and naming over one snapshot of
//! the package database and returns the metapackage names a host should
//! track.
//!
//! # Design
//!
//! - **Pure logic**: No I/O, no side effects, no state kept between calls
//! - **Never fails**: Unusable records are skipped; "nothing to recommend"
//!   is an empty string, not an error
//! - **Deterministic**: Same snapshot in any order gives the same answer
//!
//! # Families Considered
//!
//! | Operation                      | Parses                                |
//! |--------------------------------|---------------------------------------|
//! | `resolve_kernel_metapackage`   | `linux-image-*`                       |
//! | `resolve_headers_metapackage`  | `linux-image-*` and `linux-headers-*` |
//!
//! The headers metapackage follows the newest installed kernel, so image
//! packages take part in headers resolution too.
//!
//! Headers packages compete as well, so the two answers can diverge: a
//! `linux-headers-*` package left behind after its image was removed, or a
//! newer headers package from another stack, can win headers resolution
//! while the kernel answer still follows the images. This is intended;
//! callers that want headers strictly derived from the kernel answer should
//! rename the kernel result instead.

use serde::Serialize;
use tracing::{debug, info};

use crate::config_file::ResolverConfig;
use crate::logic::classify::{classify, stack_for_source};
use crate::logic::extract::{Extraction, Skipped, extract_facts};
use crate::logic::naming::metapackage_name;
use crate::logic::rank::select_current;
use crate::types::{
    InstalledPackageFact, PackageFamily, PackageRecord, ResolutionResult, Stack, Target,
};

const KERNEL_FAMILIES: &[PackageFamily] = &[PackageFamily::Image];
const HEADERS_FAMILIES: &[PackageFamily] = &[PackageFamily::Image, PackageFamily::Headers];

/// One extracted fact as seen by the resolver, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactReport {
    #[serde(flatten)]
    pub fact: InstalledPackageFact,
    pub stack: Stack,
    pub selected: bool,
}

/// Resolver over installed kernel packages.
#[derive(Debug, Clone, Default)]
pub struct KernelResolver {
    config: ResolverConfig,
}

impl KernelResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Kernel metapackage to track (`linux-generic-lts-quantal`), or empty.
    pub fn resolve_kernel_metapackage(&self, packages: &[PackageRecord]) -> String {
        self.resolve_for(packages, KERNEL_FAMILIES, PackageFamily::Image)
    }

    /// Headers metapackage to track (`linux-headers-generic-lts-quantal`),
    /// or empty.
    pub fn resolve_headers_metapackage(&self, packages: &[PackageRecord]) -> String {
        self.resolve_for(packages, HEADERS_FAMILIES, PackageFamily::Headers)
    }

    /// Resolve the requested metapackages; unrequested fields stay empty.
    pub fn resolve(&self, packages: &[PackageRecord], target: Target) -> ResolutionResult {
        let mut result = ResolutionResult::default();
        if target.wants_kernel() {
            result.kernel = self.resolve_kernel_metapackage(packages);
        }
        if target.wants_headers() {
            result.headers = self.resolve_headers_metapackage(packages);
        }
        result
    }

    /// Every kernel image fact with its stack, marking the selected one,
    /// plus the kernel-family packages that were skipped.
    pub fn inspect(&self, packages: &[PackageRecord]) -> (Vec<FactReport>, Vec<Skipped>) {
        let Extraction { facts, skipped } = self.extract(packages, KERNEL_FAMILIES);
        let marker = self.config.naming.enablement_marker.as_str();

        let stacks = classify(&facts, marker);
        let selected = select_current(&stacks).map(|s| s.fact.name.clone());

        let reports = facts
            .iter()
            .map(|fact| FactReport {
                fact: fact.clone(),
                stack: stack_for_source(fact.source_package.as_deref(), marker),
                selected: selected.as_deref() == Some(fact.name.as_str()),
            })
            .collect();

        (reports, skipped)
    }

    fn extract(&self, packages: &[PackageRecord], families: &[PackageFamily]) -> Extraction {
        extract_facts(packages, families, &self.config.ignored_markers)
    }

    fn resolve_for(
        &self,
        packages: &[PackageRecord],
        families: &[PackageFamily],
        output: PackageFamily,
    ) -> String {
        let extraction = self.extract(packages, families);
        debug!(
            facts = extraction.facts.len(),
            skipped = extraction.skipped.len(),
            family = %output,
            "extracted kernel package facts"
        );

        let naming = &self.config.naming;
        let stacks = classify(&extraction.facts, &naming.enablement_marker);

        let Some(selection) = select_current(&stacks) else {
            return String::new();
        };

        let name = metapackage_name(naming, output, &selection.fact.flavour, selection.stack);
        info!(
            metapackage = %name,
            from = %selection.fact.name,
            "resolved {} metapackage",
            output
        );
        name
    }
}

/// Kernel metapackage with the default configuration.
pub fn resolve_kernel_metapackage(packages: &[PackageRecord]) -> String {
    KernelResolver::default().resolve_kernel_metapackage(packages)
}

/// Headers metapackage with the default configuration.
pub fn resolve_headers_metapackage(packages: &[PackageRecord]) -> String {
    KernelResolver::default().resolve_headers_metapackage(packages)
}
