//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// SHA256 of the configuration, used as the registry fingerprint.
    pub fn hash(&self) -> String {
        let yaml = serde_yaml::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(yaml.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::NameTranslation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
postgres_version: "13.4"
legacy_timestamp_behavior: true
enums:
  - name: mood
    labels: [sad, ok, very_happy]
  - schema: app
    name: status
    labels: [Active, Closed]
    name_translation: none
ranges:
  - name: floatrange
    subtype: real
"#;

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.version().unwrap(), PostgresVersion::new(13, 4));
        assert!(config.legacy_timestamp_behavior);
        assert_eq!(config.enums.len(), 2);
        assert_eq!(config.enums[0].name_translation, NameTranslation::SnakeCase);
        assert_eq!(config.enums[1].store_type(), "app.status");
        assert_eq!(config.enums[1].name_translation, NameTranslation::None);
        assert_eq!(config.ranges[0].multirange_store_type(), "floatmultirange");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.postgres_version, "16.0");
        assert!(config.version().unwrap().supports_multiranges());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.ranges[0].name, "floatrange");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/pg-typemap.yaml").unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(Config::from_yaml("enums: [{labels: [a]}]").is_err());
        assert!(Config::from_yaml("postgres_version: 'abc'").is_err());
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        let a = Config::from_yaml(YAML).unwrap();
        let b = Config::from_yaml(YAML).unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);

        let mut c = a.clone();
        c.legacy_timestamp_behavior = false;
        assert_ne!(a.hash(), c.hash());
    }
}
