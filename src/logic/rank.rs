//! Stack ranking
//!
//! Picks the single kernel that matters right now: the stack whose newest
//! installed kernel is the newest overall wins, and within it the versioned
//! image that reached that version. This lets a hardware-enablement stack
//! outrank the base stack, and an architecture family outrank a sibling
//! flavour, purely on installed version.
//!
//! Ties on numerically equal versions are broken by smallest flavour, then
//! by stack order, then by the raw version text, so the outcome does not
//! depend on snapshot order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::logic::classify::StackSummary;
use crate::types::{InstalledPackageFact, Stack};

/// The winning fact and the stack it was ranked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub fact: &'a InstalledPackageFact,
    pub stack: &'a Stack,
}

/// Ordering between two candidates; `Greater` means `a` ranks higher.
fn rank(a: &Selection<'_>, b: &Selection<'_>) -> Ordering {
    a.fact
        .version
        .cmp(&b.fact.version)
        .then_with(|| b.fact.flavour.cmp(&a.fact.flavour))
        .then_with(|| b.stack.cmp(a.stack))
        .then_with(|| {
            let raw = |s: &Selection<'_>| s.fact.version.as_ref().map(|v| v.as_str().to_string());
            raw(b).cmp(&raw(a))
        })
}

/// The versioned member of a stack that reached its maximum version.
pub fn stack_leader<'a>(summary: &'a StackSummary<'a>) -> Option<Selection<'a>> {
    let max = summary.max_version?;

    summary
        .versioned()
        .filter(|fact| fact.version.as_ref() == Some(max))
        .map(|fact| Selection {
            fact,
            stack: &summary.stack,
        })
        .max_by(rank)
}

/// Select the current kernel across all stacks.
///
/// Returns `None` when no stack has a versioned member.
pub fn select_current<'a>(stacks: &'a BTreeMap<Stack, StackSummary<'a>>) -> Option<Selection<'a>> {
    let selection = stacks
        .values()
        .filter(|summary| !summary.members.is_empty())
        .filter_map(stack_leader)
        .max_by(rank);

    match &selection {
        Some(s) => debug!(
            package = %s.fact.name,
            stack = %s.stack,
            "selected current kernel"
        ),
        None => debug!("no versioned kernel installed"),
    }

    selection
}
