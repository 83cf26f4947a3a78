//! Table options.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};
use crate::literal::quote;

use super::{check_fill_factor, qualify, quote_identifier};

/// Storage and catalog options of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// `CREATE UNLOGGED TABLE`.
    #[serde(default)]
    pub unlogged: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_factor: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autovacuum_enabled: Option<bool>,

    /// Bytes; PostgreSQL accepts 128 to 8160.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toast_tuple_target: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_workers: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TableOptions {
    pub fn validate(&self) -> Result<()> {
        check_fill_factor("table", self.fill_factor)?;
        if let Some(target) = self.toast_tuple_target {
            if !(128..=8160).contains(&target) {
                return Err(MappingError::metadata(
                    "table",
                    format!("toast_tuple_target must be between 128 and 8160, got {}", target),
                ));
            }
        }
        if let Some(workers) = self.parallel_workers {
            if workers > 1024 {
                return Err(MappingError::metadata(
                    "table",
                    format!("parallel_workers must be at most 1024, got {}", workers),
                ));
            }
        }
        if let Some(tablespace) = &self.tablespace {
            quote_identifier(tablespace)?;
        }
        Ok(())
    }

    /// Storage parameters in `name=value` form, in a fixed order.
    pub fn storage_parameters(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(f) = self.fill_factor {
            params.push(format!("fillfactor={}", f));
        }
        if let Some(enabled) = self.autovacuum_enabled {
            params.push(format!("autovacuum_enabled={}", enabled));
        }
        if let Some(target) = self.toast_tuple_target {
            params.push(format!("toast_tuple_target={}", target));
        }
        if let Some(workers) = self.parallel_workers {
            params.push(format!("parallel_workers={}", workers));
        }
        params
    }

    /// `CREATE [UNLOGGED] TABLE "schema"."name"` prefix.
    pub fn create_prefix(&self, schema: Option<&str>, name: &str) -> Result<String> {
        let unlogged = if self.unlogged { "UNLOGGED " } else { "" };
        Ok(format!("CREATE {}TABLE {}", unlogged, qualify(schema, name)?))
    }

    /// Clauses following the column list: `WITH (...)` and `TABLESPACE`.
    pub fn trailing_clauses(&self) -> Result<String> {
        self.validate()?;
        let mut out = String::new();
        let params = self.storage_parameters();
        if !params.is_empty() {
            out.push_str(&format!(" WITH ({})", params.join(", ")));
        }
        if let Some(tablespace) = &self.tablespace {
            out.push_str(&format!(" TABLESPACE {}", quote_identifier(tablespace)?));
        }
        Ok(out)
    }

    /// `COMMENT ON TABLE` statement, if a comment is set.
    pub fn comment_statement(&self, schema: Option<&str>, name: &str) -> Result<Option<String>> {
        match &self.comment {
            Some(comment) => Ok(Some(format!(
                "COMMENT ON TABLE {} IS {}",
                qualify(schema, name)?,
                quote(comment)
            ))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_parameters() {
        let options = TableOptions {
            fill_factor: Some(70),
            autovacuum_enabled: Some(false),
            tablespace: Some("fast".into()),
            ..TableOptions::default()
        };
        assert_eq!(
            options.trailing_clauses().unwrap(),
            " WITH (fillfactor=70, autovacuum_enabled=false) TABLESPACE \"fast\""
        );
        assert_eq!(TableOptions::default().trailing_clauses().unwrap(), "");
    }

    #[test]
    fn test_unlogged_prefix_and_comment() {
        let options = TableOptions {
            unlogged: true,
            comment: Some("it's cached".into()),
            ..TableOptions::default()
        };
        assert_eq!(
            options.create_prefix(Some("app"), "cache").unwrap(),
            "CREATE UNLOGGED TABLE \"app\".\"cache\""
        );
        assert_eq!(
            options.comment_statement(None, "cache").unwrap().as_deref(),
            Some("COMMENT ON TABLE \"cache\" IS 'it''s cached'")
        );
    }

    #[test]
    fn test_out_of_range_options() {
        let options = TableOptions {
            fill_factor: Some(5),
            ..TableOptions::default()
        };
        assert!(options.validate().is_err());

        let options = TableOptions {
            toast_tuple_target: Some(64),
            ..TableOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(MappingError::Metadata { .. })
        ));
    }

    #[test]
    fn test_from_yaml() {
        let options: TableOptions =
            serde_yaml::from_str("unlogged: true\nfill_factor: 90\n").unwrap();
        assert!(options.unlogged);
        assert_eq!(options.fill_factor, Some(90));
        assert!(options.validate().is_ok());
    }
}
