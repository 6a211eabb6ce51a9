//! kernel-meta Library
//!
//! Resolves, from the installed kernel packages of a Debian/Ubuntu host, the
//! kernel and headers metapackages the package manager should track. Copes
//! with architecture flavours, hardware-enablement (`lts-*`) stacks and
//! variant kernels installed side by side.
//!
//! ```
//! use kernel_meta::{PackageRecord, resolve_kernel_metapackage};
//!
//! let packages = vec![
//!     PackageRecord::installed("linux-image-3.2.0-33-generic", Some("linux")),
//!     PackageRecord::installed("linux-image-3.5.0-19-generic", Some("linux-lts-quantal")),
//! ];
//! assert_eq!(resolve_kernel_metapackage(&packages), "linux-generic-lts-quantal");
//! ```

pub mod cli;
pub mod config_file;
pub mod error;
pub mod logic;
pub mod package_db;
pub mod types;
pub mod version;

// Re-export main types for convenience
pub use config_file::{NamingTable, ResolverConfig};
pub use error::{KernelMetaError, Result};
pub use types::{
    InstalledPackageFact, PackageFamily, PackageRecord, ResolutionResult, Stack, Target,
};
pub use version::KernelVersion;

// Resolver facade
pub use logic::resolver::{
    FactReport, KernelResolver, resolve_headers_metapackage, resolve_kernel_metapackage,
};
