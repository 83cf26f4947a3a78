//! Primary and alternate key options.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

use super::{check_fill_factor, quote_all, quote_identifier};

/// Which constraint a key renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Primary,
    Unique,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOptions {
    /// Constraint name; PostgreSQL generates one when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Non-key columns stored in the key's index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_factor: Option<u32>,
}

impl KeyOptions {
    pub fn validate(&self, columns: &[String]) -> Result<()> {
        if columns.is_empty() {
            return Err(MappingError::metadata("key", "a key needs at least one column"));
        }
        if let Some(name) = &self.name {
            quote_identifier(name)?;
        }
        let keys: HashSet<&str> = columns.iter().map(String::as_str).collect();
        if let Some(dup) = self.include.iter().find(|c| keys.contains(c.as_str())) {
            return Err(MappingError::metadata(
                "key",
                format!("included column '{}' is also a key column", dup),
            ));
        }
        check_fill_factor("key", self.fill_factor)
    }

    /// Table constraint clause, e.g. `CONSTRAINT "pk" PRIMARY KEY ("id")`.
    pub fn constraint_clause(&self, kind: KeyKind, columns: &[String]) -> Result<String> {
        self.validate(columns)?;
        let mut sql = match &self.name {
            Some(name) => format!("CONSTRAINT {} ", quote_identifier(name)?),
            None => String::new(),
        };
        sql.push_str(match kind {
            KeyKind::Primary => "PRIMARY KEY",
            KeyKind::Unique => "UNIQUE",
        });
        sql.push_str(&format!(" ({})", quote_all(columns)?));
        if !self.include.is_empty() {
            sql.push_str(&format!(" INCLUDE ({})", quote_all(&self.include)?));
        }
        if let Some(f) = self.fill_factor {
            sql.push_str(&format!(" WITH (fillfactor={})", f));
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_clause() {
        let options = KeyOptions {
            name: Some("pk_orders".into()),
            include: vec!["total".into()],
            fill_factor: Some(90),
        };
        let sql = options
            .constraint_clause(KeyKind::Primary, &["id".to_string()])
            .unwrap();
        assert_eq!(
            sql,
            "CONSTRAINT \"pk_orders\" PRIMARY KEY (\"id\") INCLUDE (\"total\") WITH (fillfactor=90)"
        );
    }

    #[test]
    fn test_unnamed_unique_key() {
        let sql = KeyOptions::default()
            .constraint_clause(KeyKind::Unique, &["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(sql, "UNIQUE (\"a\", \"b\")");
    }

    #[test]
    fn test_include_overlap_rejected() {
        let options = KeyOptions {
            include: vec!["id".into()],
            ..KeyOptions::default()
        };
        assert!(options.validate(&["id".to_string()]).is_err());
        assert!(KeyOptions::default().validate(&[]).is_err());
    }
}
