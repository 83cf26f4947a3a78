//! Validated option structs for PostgreSQL schema objects.
//!
//! Each schema object gets a closed struct instead of a string-keyed annotation
//! bag: [`TableOptions`], [`IndexOptions`], [`KeyOptions`] and
//! [`PropertyOptions`]. Every struct validates itself and renders the DDL
//! fragments it controls.
//!
//! Identifiers are quoted through [`quote_identifier`], which rejects names that
//! PostgreSQL would silently truncate or that contain null bytes.

mod index;
mod key;
mod property;
mod table;

pub use index::{IndexMethod, IndexOptions, NullSortOrder, SortOrder};
pub use key::{KeyKind, KeyOptions};
pub use property::{IdentityOptions, PropertyOptions, ValueGeneration};
pub use table::TableOptions;

use crate::error::{MappingError, Result};

/// PostgreSQL's identifier limit (NAMEDATALEN - 1).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Valid range for `fillfactor` on tables and indexes.
pub(crate) const FILL_FACTOR_RANGE: std::ops::RangeInclusive<u32> = 10..=100;

/// Reject empty, over-long or null-byte identifiers.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MappingError::metadata("identifier", "identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(MappingError::metadata(
            "identifier",
            format!("identifier contains a null byte: {:?}", name),
        ));
    }
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MappingError::metadata(
            "identifier",
            format!(
                "identifier exceeds {} bytes (got {}): {:?}",
                MAX_IDENTIFIER_LENGTH,
                name.len(),
                name
            ),
        ));
    }
    Ok(())
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// `"schema"."name"`, or just `"name"` without a schema.
pub fn qualify(schema: Option<&str>, name: &str) -> Result<String> {
    match schema {
        Some(schema) => Ok(format!("{}.{}", quote_identifier(schema)?, quote_identifier(name)?)),
        None => quote_identifier(name),
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
}

/// Type name as written in a cast. A `schema.name` pair is split on the first
/// dot, and each part is double-quoted only when PostgreSQL would otherwise fold
/// or reject it.
pub fn quote_type_name(name: &str) -> Result<String> {
    let quote_part = |part: &str| -> Result<String> {
        validate_identifier(part)?;
        if is_plain_identifier(part) {
            Ok(part.to_string())
        } else {
            quote_identifier(part)
        }
    };
    match name.split_once('.') {
        Some((schema, name)) => Ok(format!("{}.{}", quote_part(schema)?, quote_part(name)?)),
        None => quote_part(name),
    }
}

pub(crate) fn quote_all(names: &[String]) -> Result<String> {
    Ok(names
        .iter()
        .map(|n| quote_identifier(n))
        .collect::<Result<Vec<_>>>()?
        .join(", "))
}

pub(crate) fn check_fill_factor(object: &str, fill_factor: Option<u32>) -> Result<()> {
    match fill_factor {
        Some(f) if !FILL_FACTOR_RANGE.contains(&f) => Err(MappingError::metadata(
            object,
            format!("fill factor must be between 10 and 100, got {}", f),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users").unwrap(), "\"users\"");
        assert_eq!(quote_identifier("a\"b").unwrap(), "\"a\"\"b\"");
        assert!(quote_identifier("").is_err());
        assert!(quote_identifier("bad\0name").is_err());
        assert!(quote_identifier(&"x".repeat(64)).is_err());
        assert!(quote_identifier(&"x".repeat(63)).is_ok());
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify(Some("app"), "t").unwrap(), "\"app\".\"t\"");
        assert_eq!(qualify(None, "t").unwrap(), "\"t\"");
    }

    #[test]
    fn test_quote_type_name() {
        assert_eq!(quote_type_name("mood").unwrap(), "mood");
        assert_eq!(quote_type_name("app.mood").unwrap(), "app.mood");
        assert_eq!(quote_type_name("Mood").unwrap(), "\"Mood\"");
        assert_eq!(quote_type_name("App.order status").unwrap(), "\"App\".\"order status\"");
        assert!(quote_type_name("").is_err());
    }

    #[test]
    fn test_fill_factor_bounds() {
        assert!(check_fill_factor("table", Some(10)).is_ok());
        assert!(check_fill_factor("table", Some(100)).is_ok());
        assert!(check_fill_factor("table", Some(9)).is_err());
        assert!(check_fill_factor("table", None).is_ok());
    }
}
