//! Configuration file handling for the resolver.
//!
//! The naming convention is kept as data so that distributions with a
//! different metapackage scheme only need a different file, not a rebuild.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How metapackage names are assembled from a flavour and a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingTable {
    /// Prefix of the kernel metapackage (`linux-generic`)
    pub image_prefix: String,
    /// Prefix of the headers metapackage (`linux-headers-generic`)
    pub headers_prefix: String,
    /// Marker separating the flavour from the stack codename, both in
    /// source package names and in the output (`-lts-quantal`)
    pub enablement_marker: String,
    /// Flavours left out of the output name entirely
    pub elided_flavours: Vec<String>,
}

impl Default for NamingTable {
    fn default() -> Self {
        Self {
            image_prefix: "linux".to_string(),
            headers_prefix: "linux-headers".to_string(),
            enablement_marker: "lts".to_string(),
            elided_flavours: Vec::new(),
        }
    }
}

/// Resolver configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub naming: NamingTable,
    /// Name segments marking add-on packages that are not kernels
    /// (`linux-image-extra-3.5.0-18-generic`)
    pub ignored_markers: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            naming: NamingTable::default(),
            ignored_markers: vec!["extra".to_string()],
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let naming = &self.naming;

        for (field, value) in [
            ("image_prefix", &naming.image_prefix),
            ("headers_prefix", &naming.headers_prefix),
            ("enablement_marker", &naming.enablement_marker),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", field);
            }
            if value.contains(char::is_whitespace) {
                anyhow::bail!("{} cannot contain whitespace", field);
            }
            if value.starts_with('-') || value.ends_with('-') {
                anyhow::bail!("{} must not start or end with '-'", field);
            }
        }

        if naming.image_prefix == naming.headers_prefix {
            anyhow::bail!("image_prefix and headers_prefix must differ");
        }

        for flavour in &naming.elided_flavours {
            if flavour.trim().is_empty() || flavour.contains(char::is_whitespace) {
                anyhow::bail!("Invalid elided flavour: {:?}", flavour);
            }
        }

        for marker in &self.ignored_markers {
            if marker.trim().is_empty() || marker.contains(['-', ' ']) {
                anyhow::bail!("Ignored marker must be a single name segment: {:?}", marker);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.naming.image_prefix, "linux");
        assert_eq!(config.naming.headers_prefix, "linux-headers");
        assert_eq!(config.naming.enablement_marker, "lts");
        assert!(config.naming.elided_flavours.is_empty());
        assert_eq!(config.ignored_markers, vec!["extra"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_new_equals_default() {
        assert_eq!(ResolverConfig::new(), ResolverConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut config = ResolverConfig::default();
        config.naming.elided_flavours = vec!["generic".to_string()];

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = ResolverConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{ "naming": { "elided_flavours": ["generic"] } }"#)
            .unwrap();
        temp_file.flush().unwrap();

        let loaded = ResolverConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.naming.image_prefix, "linux");
        assert_eq!(loaded.naming.elided_flavours, vec!["generic"]);
        assert_eq!(loaded.ignored_markers, vec!["extra"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ResolverConfig::load_from_file(Path::new("/nonexistent/path"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ invalid json }").unwrap();
        temp_file.flush().unwrap();

        let result = ResolverConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_prefix() {
        let mut config = ResolverConfig::default();
        config.naming.image_prefix = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_prefix"));
    }

    #[test]
    fn test_validation_trailing_dash() {
        let mut config = ResolverConfig::default();
        config.naming.headers_prefix = "linux-headers-".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_same_prefixes() {
        let mut config = ResolverConfig::default();
        config.naming.headers_prefix = "linux".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_marker() {
        let mut config = ResolverConfig::default();
        config.ignored_markers = vec!["extra-modules".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_elided_flavour() {
        let mut config = ResolverConfig::default();
        config.naming.elided_flavours = vec!["".to_string()];
        assert!(config.validate().is_err());
    }
}
