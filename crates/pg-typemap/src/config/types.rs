//! Configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};
use crate::literal::NameTranslation;

/// Provider options that drive registry construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// PostgreSQL server version as `major.minor` (default "16.0").
    #[serde(default = "default_postgres_version")]
    pub postgres_version: String,

    /// Legacy timestamp rendering: no infinity sentinels for `timestamp`,
    /// and local or unspecified date-times accepted by `timestamptz`.
    #[serde(default)]
    pub legacy_timestamp_behavior: bool,

    /// User enum types to register.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumConfig>,

    /// User range types to register.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            postgres_version: default_postgres_version(),
            legacy_timestamp_behavior: false,
            enums: Vec::new(),
            ranges: Vec::new(),
        }
    }
}

impl Config {
    /// Parsed server version.
    pub fn version(&self) -> Result<PostgresVersion> {
        self.postgres_version.parse()
    }
}

/// A PostgreSQL enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub name: String,

    /// Labels in declaration order.
    pub labels: Vec<String>,

    /// How member names map to labels.
    #[serde(default)]
    pub name_translation: NameTranslation,
}

impl EnumConfig {
    /// Schema-qualified store type name.
    pub fn store_type(&self) -> String {
        qualify(self.schema.as_deref(), &self.name)
    }
}

/// A PostgreSQL range type over a subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub name: String,

    /// Store type of the range's subtype (e.g. `real`).
    pub subtype: String,

    /// Multirange type name; defaults to PostgreSQL's naming rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multirange: Option<String>,
}

impl RangeConfig {
    /// Schema-qualified store type name.
    pub fn store_type(&self) -> String {
        qualify(self.schema.as_deref(), &self.name)
    }

    /// Schema-qualified multirange name.
    ///
    /// Without an explicit name, the last `range` in the range name becomes
    /// `multirange`; a name without `range` gets `_multirange` appended.
    pub fn multirange_store_type(&self) -> String {
        let name = match &self.multirange {
            Some(name) => name.clone(),
            None => default_multirange_name(&self.name),
        };
        qualify(self.schema.as_deref(), &name)
    }
}

/// PostgreSQL's default multirange name for a range type name.
pub fn default_multirange_name(range: &str) -> String {
    match range.rfind("range") {
        Some(pos) => format!("{}multirange{}", &range[..pos], &range[pos + 5..]),
        None => format!("{}_multirange", range),
    }
}

fn qualify(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) if !schema.is_empty() => format!("{}.{}", schema, name),
        _ => name.to_string(),
    }
}

/// A `major.minor` PostgreSQL server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PostgresVersion {
    pub major: u32,
    pub minor: u32,
}

impl PostgresVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Multirange types exist from PostgreSQL 14.
    pub fn supports_multiranges(&self) -> bool {
        self.major >= 14
    }

    /// `NULLS NOT DISTINCT` exists from PostgreSQL 15.
    pub fn supports_nulls_distinct(&self) -> bool {
        self.major >= 15
    }
}

impl FromStr for PostgresVersion {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MappingError::Config(format!("invalid postgres_version '{}'", s));
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { major, minor })
    }
}

impl fmt::Display for PostgresVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// Default value functions for serde
fn default_postgres_version() -> String {
    "16.0".to_string()
}
