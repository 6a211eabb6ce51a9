//! Metapackage naming
//!
//! `<prefix>[-<flavour>][-<marker>-<codename>]`, with the pieces taken from
//! a [`NamingTable`]:
//!
//! | Flavour        | Stack               | Kernel                      | Headers |
//! |----------------|---------------------|-----------------------------|---------|
//! | `generic`      | `Enablement(quantal)` | `linux-generic-lts-quantal` | `linux-headers-generic-lts-quantal` |
//! | `powerpc-smp`  | `Family(ppc)`       | `linux-powerpc-smp`         | `linux-headers-powerpc-smp` |
//! | `lowlatency`   | `Base`              | `linux-lowlatency`          | `linux-headers-lowlatency` |

use crate::config_file::NamingTable;
use crate::types::{PackageFamily, Stack};

/// Metapackage name for a flavour in a stack.
pub fn metapackage_name(
    naming: &NamingTable,
    family: PackageFamily,
    flavour: &str,
    stack: &Stack,
) -> String {
    let prefix = match family {
        PackageFamily::Image => naming.image_prefix.as_str(),
        PackageFamily::Headers => naming.headers_prefix.as_str(),
    };

    let mut parts = vec![prefix];

    if !naming.elided_flavours.iter().any(|f| f == flavour) {
        parts.push(flavour);
    }

    if let Some(codename) = stack.codename() {
        parts.push(naming.enablement_marker.as_str());
        parts.push(codename);
    }

    parts.join("-")
}
