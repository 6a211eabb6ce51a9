//! Flavour classification
//!
//! Groups facts into [`Stack`]s using the declared source package as the
//! ground truth.
//!
//! # Stack Rules
//!
//! | Source package                       | Stack              |
//! |--------------------------------------|--------------------|
//! | absent, `linux`, `linux-meta`        | `Base`             |
//! | `linux-lts-quantal`, `linux-meta-lts-quantal` | `Enablement("quantal")` |
//! | `linux-ppc`, `linux-meta-powerpc-smp` | `Family(..)`      |
//! | not a `linux` source at all          | `Base`             |

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{InstalledPackageFact, Stack};
use crate::version::KernelVersion;

/// Map a source package name to its stack.
///
/// `marker` is the enablement marker (`lts`).
pub fn stack_for_source(source: Option<&str>, marker: &str) -> Stack {
    let Some(rest) = source.and_then(|s| s.strip_prefix("linux-")) else {
        return Stack::Base;
    };

    if rest == "meta" {
        return Stack::Base;
    }
    let rest = rest.strip_prefix("meta-").unwrap_or(rest);

    // `lts-quantal` directly, or embedded like `signed-lts-quantal`
    let head = format!("{}-", marker);
    let embedded = format!("-{}-", marker);
    let codename = rest
        .strip_prefix(head.as_str())
        .or_else(|| rest.find(&embedded).map(|idx| &rest[idx + embedded.len()..]));

    match codename {
        Some(codename) if !codename.is_empty() => Stack::Enablement(codename.to_string()),
        _ => Stack::Family(rest.to_string()),
    }
}

/// Flavour a fact contributes to its stack.
///
/// Meta aliases of an enablement stack repeat the codename in their name
/// (`linux-image-generic-lts-quantal`); that suffix is not part of the
/// flavour.
pub fn stack_flavour<'a>(fact: &'a InstalledPackageFact, stack: &Stack, marker: &str) -> &'a str {
    let Some(codename) = stack.codename().filter(|_| fact.is_meta()) else {
        return &fact.flavour;
    };

    let suffix = format!("-{}-{}", marker, codename);
    match fact.flavour.strip_suffix(suffix.as_str()) {
        Some(flavour) if !flavour.is_empty() => flavour,
        _ => &fact.flavour,
    }
}

/// Everything known about one stack in the current snapshot.
#[derive(Debug, Clone)]
pub struct StackSummary<'a> {
    pub stack: Stack,
    pub members: Vec<&'a InstalledPackageFact>,
    /// Flavours for which the stack ships an installed meta alias
    pub meta_flavours: BTreeSet<String>,
    /// Highest version among versioned members
    pub max_version: Option<&'a KernelVersion>,
}

impl<'a> StackSummary<'a> {
    fn new(stack: Stack) -> Self {
        Self {
            stack,
            members: Vec::new(),
            meta_flavours: BTreeSet::new(),
            max_version: None,
        }
    }

    pub fn has_meta(&self) -> bool {
        !self.meta_flavours.is_empty()
    }

    /// Versioned members, in snapshot order
    pub fn versioned(&self) -> impl Iterator<Item = &'a InstalledPackageFact> + '_ {
        self.members.iter().copied().filter(|f| !f.is_meta())
    }
}

/// Assign every fact to a stack.
///
/// The map is keyed by [`Stack`], so iteration order is fixed regardless of
/// the order facts arrived in.
pub fn classify<'a>(
    facts: &'a [InstalledPackageFact],
    marker: &str,
) -> BTreeMap<Stack, StackSummary<'a>> {
    let mut stacks: BTreeMap<Stack, StackSummary<'a>> = BTreeMap::new();

    for fact in facts {
        let stack = stack_for_source(fact.source_package.as_deref(), marker);
        let summary = stacks
            .entry(stack.clone())
            .or_insert_with(|| StackSummary::new(stack.clone()));

        match &fact.version {
            None => {
                let flavour = stack_flavour(fact, &stack, marker);
                summary.meta_flavours.insert(flavour.to_string());
            }
            Some(version) => {
                if summary.max_version.is_none_or(|max| version > max) {
                    summary.max_version = Some(version);
                }
            }
        }
        summary.members.push(fact);
    }

    stacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PackageFamily;

    fn fact(name: &str, version: Option<&str>, flavour: &str, source: Option<&str>) -> InstalledPackageFact {
        InstalledPackageFact {
            name: name.to_string(),
            version: version.map(KernelVersion::new),
            source_package: source.map(str::to_string),
            flavour: flavour.to_string(),
            family: PackageFamily::Image,
        }
    }

    #[test]
    fn test_base_sources() {
        assert_eq!(stack_for_source(None, "lts"), Stack::Base);
        assert_eq!(stack_for_source(Some("linux"), "lts"), Stack::Base);
        assert_eq!(stack_for_source(Some("linux-meta"), "lts"), Stack::Base);
        assert_eq!(stack_for_source(Some("nvidia-graphics-drivers"), "lts"), Stack::Base);
        assert_eq!(stack_for_source(Some("linuxdoc-tools"), "lts"), Stack::Base);
    }

    #[test]
    fn test_enablement_sources() {
        let quantal = Stack::Enablement("quantal".to_string());
        assert_eq!(stack_for_source(Some("linux-lts-quantal"), "lts"), quantal);
        assert_eq!(stack_for_source(Some("linux-meta-lts-quantal"), "lts"), quantal);
        assert_eq!(stack_for_source(Some("linux-signed-lts-quantal"), "lts"), quantal);
    }

    #[test]
    fn test_family_sources() {
        assert_eq!(
            stack_for_source(Some("linux-ppc"), "lts"),
            Stack::Family("ppc".to_string())
        );
        assert_eq!(
            stack_for_source(Some("linux-meta-powerpc-smp"), "lts"),
            Stack::Family("powerpc-smp".to_string())
        );
        assert_eq!(
            stack_for_source(Some("linux-ti-omap4"), "lts"),
            Stack::Family("ti-omap4".to_string())
        );
        // Codename missing after the marker
        assert_eq!(
            stack_for_source(Some("linux-lts-"), "lts"),
            Stack::Family("lts-".to_string())
        );
    }

    #[test]
    fn test_custom_marker() {
        assert_eq!(
            stack_for_source(Some("linux-meta-hwe-edge"), "hwe"),
            Stack::Enablement("edge".to_string())
        );
        assert_eq!(
            stack_for_source(Some("linux-lts-quantal"), "hwe"),
            Stack::Family("lts-quantal".to_string())
        );
    }

    #[test]
    fn test_stack_flavour_strips_codename_from_meta() {
        let stack = Stack::Enablement("quantal".to_string());
        let meta = fact("linux-image-generic-lts-quantal", None, "generic-lts-quantal", None);
        assert_eq!(stack_flavour(&meta, &stack, "lts"), "generic");

        let versioned = fact("linux-image-3.5.0-19-generic", Some("3.5.0-19"), "generic", None);
        assert_eq!(stack_flavour(&versioned, &stack, "lts"), "generic");

        let base_meta = fact("linux-image-generic", None, "generic", None);
        assert_eq!(stack_flavour(&base_meta, &Stack::Base, "lts"), "generic");
    }

    #[test]
    fn test_classify_groups_and_tracks_max() {
        let facts = vec![
            fact("linux-image-3.2.0-23-generic", Some("3.2.0-23"), "generic", Some("linux")),
            fact("linux-image-3.2.0-33-generic", Some("3.2.0-33"), "generic", Some("linux")),
            fact("linux-image-3.5.0-19-generic", Some("3.5.0-19"), "generic", Some("linux-lts-quantal")),
            fact("linux-image-3.5.0-18-generic", Some("3.5.0-18"), "generic", Some("linux-lts-quantal")),
            fact("linux-image-generic", None, "generic", Some("linux-meta")),
            fact(
                "linux-image-generic-lts-quantal",
                None,
                "generic-lts-quantal",
                Some("linux-meta-lts-quantal"),
            ),
        ];

        let stacks = classify(&facts, "lts");
        assert_eq!(stacks.len(), 2);

        let base = &stacks[&Stack::Base];
        assert_eq!(base.members.len(), 3);
        assert_eq!(base.max_version.map(|v| v.as_str()), Some("3.2.0-33"));
        assert!(base.meta_flavours.contains("generic"));

        let quantal = &stacks[&Stack::Enablement("quantal".to_string())];
        assert_eq!(quantal.members.len(), 3);
        assert_eq!(quantal.max_version.map(|v| v.as_str()), Some("3.5.0-19"));
        assert!(quantal.has_meta());
        assert!(quantal.meta_flavours.contains("generic"));
        assert_eq!(quantal.versioned().count(), 2);
    }

    #[test]
    fn test_meta_only_stack_has_no_max() {
        let facts = vec![fact("linux-image-nexus7", None, "nexus7", Some("linux-meta-nexus7"))];
        let stacks = classify(&facts, "lts");
        let summary = &stacks[&Stack::Family("nexus7".to_string())];
        assert!(summary.has_meta());
        assert!(summary.max_version.is_none());
    }

    #[test]
    fn test_missing_source_falls_back_to_base() {
        let facts = vec![fact("linux-image-3.8.0-0-lowlatency", Some("3.8.0-0"), "lowlatency", None)];
        let stacks = classify(&facts, "lts");
        assert!(stacks.contains_key(&Stack::Base));
    }
}
