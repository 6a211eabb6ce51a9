//! Type-safe domain types for kernel-meta
//!
//! Package records come in from the package database; facts, stacks and
//! results are derived from them fresh on every resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

use crate::version::KernelVersion;

/// One package as reported by the package database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    /// `Source:` field of the binary package, when the package declares one
    #[serde(default)]
    pub source: Option<String>,
    /// Installed, or marked for installation
    #[serde(default = "default_installed")]
    pub installed: bool,
}

fn default_installed() -> bool {
    true
}

impl PackageRecord {
    /// Record for an installed package
    pub fn installed(name: impl Into<String>, source: Option<&str>) -> Self {
        Self {
            name: name.into(),
            source: source.map(str::to_string),
            installed: true,
        }
    }

    /// Record for a package that is only available in the archive
    pub fn available(name: impl Into<String>, source: Option<&str>) -> Self {
        Self {
            installed: false,
            ..Self::installed(name, source)
        }
    }

    /// Source package name with any `(version)` suffix removed.
    ///
    /// Returns `None` when the field is absent or blank.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref()?.split_whitespace().next()
    }
}

/// Which kernel package family a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PackageFamily {
    Image,
    Headers,
}

impl PackageFamily {
    /// Fixed prefix of installed package names in this family
    pub fn package_prefix(&self) -> &'static str {
        match self {
            Self::Image => "linux-image-",
            Self::Headers => "linux-headers-",
        }
    }
}

/// Which metapackage(s) the caller wants resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Kernel,
    Headers,
    #[default]
    Both,
}

impl Target {
    pub fn wants_kernel(&self) -> bool {
        matches!(self, Self::Kernel | Self::Both)
    }

    pub fn wants_headers(&self) -> bool {
        matches!(self, Self::Headers | Self::Both)
    }
}

/// Structured view of one installed kernel package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackageFact {
    pub name: String,
    /// Version embedded in the name; `None` for meta alias packages
    pub version: Option<KernelVersion>,
    pub source_package: Option<String>,
    /// Architecture/variant suffix, never empty
    pub flavour: String,
    pub family: PackageFamily,
}

impl InstalledPackageFact {
    /// True for alias packages such as `linux-image-generic`
    pub fn is_meta(&self) -> bool {
        self.version.is_none()
    }
}

/// Grouping a kernel package belongs to, derived from its source package.
///
/// Variant order doubles as the deterministic tie-break order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Stack {
    /// The distribution's own kernel (`linux`, `linux-meta`, or unknown)
    Base,
    /// Architecture or variant source (`linux-ppc`, `linux-ti-omap4`);
    /// named like the base stack
    Family(String),
    /// Hardware-enablement point release (`linux-lts-quantal`)
    Enablement(String),
}

impl Stack {
    /// Codename carried into the metapackage name, if any
    pub fn codename(&self) -> Option<&str> {
        match self {
            Self::Enablement(codename) => Some(codename),
            Self::Base | Self::Family(_) => None,
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Family(root) => write!(f, "family:{}", root),
            Self::Enablement(codename) => write!(f, "lts-{}", codename),
        }
    }
}

/// The two resolver outputs. Empty strings mean "no clear recommendation".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub kernel: String,
    pub headers: String,
}

impl ResolutionResult {
    pub fn is_empty(&self) -> bool {
        self.kernel.is_empty() && self.headers.is_empty()
    }
}
