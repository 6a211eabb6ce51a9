//! Kernel version ordering.
//!
//! Versions embedded in kernel package names (`3.5.0-18`, `3.2.0-1419`,
//! `3.0.27-1`) are compared segment by segment. Segments are split on `.`,
//! `-`, `~` and `+`. Two numeric segments compare by value with no width
//! limit (`018 == 18`, and a segment too wide for any integer type still
//! orders correctly). Two non-numeric segments compare byte-wise. A numeric
//! segment sorts below a non-numeric one, which matches byte order for the
//! usual alphanumeric tags (`18 < rc1`) and keeps the ordering total on
//! malformed input.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A version string taken from a kernel package name.
#[derive(Debug, Clone)]
pub struct KernelVersion {
    raw: String,
}

impl KernelVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw
            .split(['.', '-', '~', '+'])
            .filter(|s| !s.is_empty())
    }
}

fn is_numeric(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

impl Ord for KernelVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.segments();
        let mut right = other.segments();
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) => match compare_segment(a, b) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
                // 3.5.0 < 3.5.0-18
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => return Ordering::Equal,
            }
        }
    }
}

impl PartialOrd for KernelVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KernelVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KernelVersion {}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for KernelVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
