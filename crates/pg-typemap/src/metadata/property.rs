//! Column (property) options: value generation, identity, compression, collation.

use serde::{Deserialize, Serialize};

use crate::core::DialectTag;
use crate::error::{MappingError, Result};
use crate::mapping::ValueKind;

use super::{qualify, quote_identifier};

/// How a column's values are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueGeneration {
    /// `GENERATED ALWAYS AS IDENTITY`.
    IdentityAlways,
    /// `GENERATED BY DEFAULT AS IDENTITY`.
    IdentityByDefault,
    /// `serial` / `bigserial` / `smallserial`.
    Serial,
    /// Client-side hi-lo allocation from a sequence.
    SequenceHiLo,
    /// `DEFAULT nextval(...)` from a dedicated sequence.
    Sequence,
}

impl ValueGeneration {
    fn is_identity(self) -> bool {
        matches!(self, ValueGeneration::IdentityAlways | ValueGeneration::IdentityByDefault)
    }
}

/// Sequence options of an identity column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub is_cyclic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_to_cache: Option<i64>,
}

impl IdentityOptions {
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(MappingError::metadata("identity", message));
        if self.increment_by == Some(0) {
            return fail("increment must not be zero".into());
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return fail(format!("min value {} exceeds max value {}", min, max));
            }
        }
        if let Some(start) = self.start_value {
            if self.min_value.is_some_and(|min| start < min) {
                return fail(format!("start value {} is below the min value", start));
            }
            if self.max_value.is_some_and(|max| start > max) {
                return fail(format!("start value {} is above the max value", start));
            }
        }
        if let Some(cache) = self.number_to_cache {
            if cache < 1 {
                return fail(format!("cache must be at least 1, got {}", cache));
            }
        }
        Ok(())
    }

    /// Sequence option list without parentheses; empty when nothing is set.
    pub fn sequence_options(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = self.start_value {
            parts.push(format!("START WITH {}", v));
        }
        if let Some(v) = self.increment_by {
            parts.push(format!("INCREMENT BY {}", v));
        }
        if let Some(v) = self.min_value {
            parts.push(format!("MINVALUE {}", v));
        }
        if let Some(v) = self.max_value {
            parts.push(format!("MAXVALUE {}", v));
        }
        if self.is_cyclic {
            parts.push("CYCLE".to_string());
        }
        if let Some(v) = self.number_to_cache {
            parts.push(format!("CACHE {}", v));
        }
        parts.join(" ")
    }
}

/// Options of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_generation: Option<ValueGeneration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi_lo_sequence_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi_lo_sequence_schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_options: Option<IdentityOptions>,

    /// `pglz` or `lz4`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
}

fn is_text(tag: &DialectTag) -> bool {
    matches!(
        tag,
        DialectTag::Text | DialectTag::Varchar | DialectTag::Char | DialectTag::Name | DialectTag::Citext
    )
}

impl PropertyOptions {
    /// Check the options against the column's value kind.
    pub fn validate(&self, kind: &ValueKind) -> Result<()> {
        let fail = |message: String| Err(MappingError::metadata("property", message));

        if let Some(generation) = self.value_generation {
            if !matches!(
                kind.dialect_tag(),
                DialectTag::Smallint | DialectTag::Integer | DialectTag::Bigint
            ) {
                return fail(format!(
                    "{:?} value generation needs an integer column, not '{}'",
                    generation,
                    kind.store_type()
                ));
            }
        }

        let hi_lo = self.value_generation == Some(ValueGeneration::SequenceHiLo);
        if !hi_lo && (self.hi_lo_sequence_name.is_some() || self.hi_lo_sequence_schema.is_some()) {
            return fail("hi-lo sequence names need sequence_hi_lo value generation".into());
        }
        if let Some(name) = &self.hi_lo_sequence_name {
            qualify(self.hi_lo_sequence_schema.as_deref(), name)?;
        }

        if let Some(identity) = &self.identity_options {
            if !self.value_generation.is_some_and(ValueGeneration::is_identity) {
                return fail("identity options need identity value generation".into());
            }
            identity.validate()?;
        }

        if let Some(method) = &self.compression_method {
            if !matches!(method.as_str(), "pglz" | "lz4") {
                return fail(format!("unknown compression method '{}'", method));
            }
        }

        if let Some(collation) = &self.collation {
            if !is_text(kind.dialect_tag()) {
                return fail(format!(
                    "collation '{}' set on non-text column '{}'",
                    collation,
                    kind.store_type()
                ));
            }
        }
        Ok(())
    }

    /// Column type and modifiers as they appear in `CREATE TABLE`, after the
    /// column name. `serial` replaces the integer type name.
    pub fn column_definition(&self, kind: &ValueKind) -> Result<String> {
        self.validate(kind)?;

        let mut sql = match (self.value_generation, kind.dialect_tag()) {
            (Some(ValueGeneration::Serial), DialectTag::Smallint) => "smallserial".to_string(),
            (Some(ValueGeneration::Serial), DialectTag::Integer) => "serial".to_string(),
            (Some(ValueGeneration::Serial), _) => "bigserial".to_string(),
            _ => kind.store_type().to_string(),
        };
        if let Some(method) = &self.compression_method {
            sql.push_str(&format!(" COMPRESSION {}", method));
        }
        if let Some(collation) = &self.collation {
            sql.push_str(&format!(" COLLATE {}", quote_identifier(collation)?));
        }
        if let Some(generation) = self.value_generation.filter(|g| g.is_identity()) {
            sql.push_str(if generation == ValueGeneration::IdentityAlways {
                " GENERATED ALWAYS AS IDENTITY"
            } else {
                " GENERATED BY DEFAULT AS IDENTITY"
            });
            let options = self
                .identity_options
                .as_ref()
                .map(IdentityOptions::sequence_options)
                .unwrap_or_default();
            if !options.is_empty() {
                sql.push_str(&format!(" ({})", options));
            }
        }
        // Generated columns are implicitly non-nullable.
        if self.value_generation.is_some() {
            sql.push_str(" NOT NULL");
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::ClrShape;
    use crate::registry::ValueKindRegistry;

    fn kind(store_type: &str) -> ValueKind {
        ValueKindRegistry::with_builtins(&Config::default())
            .unwrap()
            .resolve_by_store_type(store_type)
            .unwrap()
    }

    #[test]
    fn test_identity_column() {
        let options = PropertyOptions {
            value_generation: Some(ValueGeneration::IdentityAlways),
            identity_options: Some(IdentityOptions {
                start_value: Some(100),
                increment_by: Some(10),
                ..IdentityOptions::default()
            }),
            ..PropertyOptions::default()
        };
        assert_eq!(
            options.column_definition(&kind("bigint")).unwrap(),
            "bigint GENERATED ALWAYS AS IDENTITY (START WITH 100 INCREMENT BY 10) NOT NULL"
        );
    }

    #[test]
    fn test_serial_column() {
        let options = PropertyOptions {
            value_generation: Some(ValueGeneration::Serial),
            ..PropertyOptions::default()
        };
        assert_eq!(options.column_definition(&kind("int4")).unwrap(), "serial NOT NULL");
        assert_eq!(options.column_definition(&kind("int2")).unwrap(), "smallserial NOT NULL");
    }

    #[test]
    fn test_value_generation_needs_integer() {
        let options = PropertyOptions {
            value_generation: Some(ValueGeneration::IdentityByDefault),
            ..PropertyOptions::default()
        };
        assert!(options.validate(&kind("text")).is_err());
        assert!(options.validate(&kind("uuid")).is_err());
        assert!(options.validate(&kind("smallint")).is_ok());
    }

    #[test]
    fn test_collation_and_compression() {
        let options = PropertyOptions {
            collation: Some("de-DE-x-icu".into()),
            compression_method: Some("lz4".into()),
            ..PropertyOptions::default()
        };
        assert_eq!(
            options.column_definition(&kind("varchar(40)")).unwrap(),
            "character varying(40) COMPRESSION lz4 COLLATE \"de-DE-x-icu\""
        );
        assert!(options.validate(&kind("integer")).is_err());

        let bad = PropertyOptions {
            compression_method: Some("zstd".into()),
            ..PropertyOptions::default()
        };
        assert!(bad.validate(&kind("text")).is_err());
    }

    #[test]
    fn test_identity_option_bounds() {
        let bad = IdentityOptions {
            start_value: Some(0),
            min_value: Some(1),
            ..IdentityOptions::default()
        };
        assert!(bad.validate().is_err());
        assert!(IdentityOptions {
            increment_by: Some(0),
            ..IdentityOptions::default()
        }
        .validate()
        .is_err());

        let options = PropertyOptions {
            identity_options: Some(IdentityOptions::default()),
            ..PropertyOptions::default()
        };
        assert!(options.validate(&kind("bigint")).is_err());
    }

    #[test]
    fn test_hi_lo_names_need_hi_lo() {
        let options = PropertyOptions {
            value_generation: Some(ValueGeneration::Sequence),
            hi_lo_sequence_name: Some("seq".into()),
            ..PropertyOptions::default()
        };
        assert!(options.validate(&kind("bigint")).is_err());

        let options = PropertyOptions {
            value_generation: Some(ValueGeneration::SequenceHiLo),
            hi_lo_sequence_name: Some("seq".into()),
            ..PropertyOptions::default()
        };
        assert!(options.validate(&kind("bigint")).is_ok());
        assert_eq!(kind("bigint").clr_shape(), &ClrShape::I64);
    }
}
