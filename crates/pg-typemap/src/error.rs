//! Error types for type mapping, literal generation and parameter configuration.

use thiserror::Error;

/// Main error type for the mapping engine.
#[derive(Error, Debug)]
pub enum MappingError {
    /// No value kind is registered for the requested shape/store type combination.
    #[error("No type mapping found for CLR shape '{shape}'{}", hint_suffix(.hint))]
    TypeMappingNotFound {
        shape: String,
        hint: Option<String>,
    },

    /// A literal formatter received a value of the wrong shape.
    #[error("The '{family}' literal formatter cannot format a value of shape '{actual}'")]
    UnsupportedLiteralShape { family: String, actual: String },

    /// Multi-dimensional array literal requested.
    #[error("Array literals of rank {rank} are not supported; only single-dimensional arrays can be rendered")]
    UnsupportedRank { rank: usize },

    /// A timestamp with an unspecified or local kind reached a UTC-only type.
    #[error("Cannot generate a '{store_type}' literal for a DateTime with Kind={kind}: only UTC is supported")]
    AmbiguousTemporalKind { kind: String, store_type: String },

    /// A store type name could not be parsed.
    #[error("Invalid store type '{0}'")]
    InvalidStoreType(String),

    /// A SQL literal could not be parsed back into a value.
    #[error("Cannot parse '{literal}' as a '{store_type}' literal")]
    InvalidLiteral { store_type: String, literal: String },

    /// An enum member has no label in the mapped PostgreSQL enum.
    #[error("Enum member '{member}' has no label in enum type '{store_type}'")]
    UnknownEnumLabel { store_type: String, member: String },

    /// A value converter rejected its input.
    #[error("Value conversion failed: {0}")]
    Conversion(String),

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema object options failed validation.
    #[error("Invalid {object} options: {message}")]
    Metadata { object: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(h) => format!(" and store type '{}'", h),
        None => String::new(),
    }
}

impl MappingError {
    /// Create a TypeMappingNotFound error.
    pub fn not_found(shape: impl ToString, hint: Option<&str>) -> Self {
        MappingError::TypeMappingNotFound {
            shape: shape.to_string(),
            hint: hint.map(str::to_string),
        }
    }

    /// Create an UnsupportedLiteralShape error.
    pub fn unsupported_shape(family: impl Into<String>, actual: impl ToString) -> Self {
        MappingError::UnsupportedLiteralShape {
            family: family.into(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidLiteral error.
    pub fn invalid_literal(store_type: impl Into<String>, literal: impl Into<String>) -> Self {
        MappingError::InvalidLiteral {
            store_type: store_type.into(),
            literal: literal.into(),
        }
    }

    /// Create a Metadata validation error.
    pub fn metadata(object: impl Into<String>, message: impl Into<String>) -> Self {
        MappingError::Metadata {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_hint() {
        let err = MappingError::not_found("Array(I32)", Some("integer[]"));
        let msg = err.to_string();
        assert!(msg.contains("Array(I32)"));
        assert!(msg.contains("integer[]"));

        let err = MappingError::not_found("Uuid", None);
        assert!(!err.to_string().contains("store type"));
    }

    #[test]
    fn test_unsupported_shape_names_both_sides() {
        let err = MappingError::unsupported_shape("bytea", "Text");
        let msg = err.to_string();
        assert!(msg.contains("bytea"));
        assert!(msg.contains("Text"));
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.yaml");
        let err = MappingError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error"));
    }
}
