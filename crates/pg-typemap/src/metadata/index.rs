//! Index options.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PostgresVersion;
use crate::error::{MappingError, Result};

use super::{check_fill_factor, qualify, quote_all, quote_identifier};

/// Index access method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMethod {
    #[default]
    Btree,
    Hash,
    Gist,
    Gin,
    Spgist,
    Brin,
}

impl IndexMethod {
    /// Methods that accept an `INCLUDE` column list.
    pub fn supports_include(self) -> bool {
        matches!(self, IndexMethod::Btree | IndexMethod::Gist | IndexMethod::Spgist)
    }
}

impl fmt::Display for IndexMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexMethod::Btree => "btree",
            IndexMethod::Hash => "hash",
            IndexMethod::Gist => "gist",
            IndexMethod::Gin => "gin",
            IndexMethod::Spgist => "spgist",
            IndexMethod::Brin => "brin",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullSortOrder {
    NullsFirst,
    NullsLast,
}

/// Options of one index.
///
/// Per-column vectors (`operators`, `collations`, `sort_order`,
/// `null_sort_order`) are either empty or hold one entry per key column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    #[serde(default)]
    pub method: IndexMethod,

    /// Operator class per column; `None` uses the default class.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<Option<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collations: Vec<Option<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_order: Vec<SortOrder>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub null_sort_order: Vec<NullSortOrder>,

    /// Non-key columns stored in the index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(default)]
    pub created_concurrently: bool,

    /// `Some(false)` renders `NULLS NOT DISTINCT` (PostgreSQL 15+).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls_distinct: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_factor: Option<u32>,
}

impl IndexOptions {
    pub fn validate(&self, columns: &[String], version: PostgresVersion) -> Result<()> {
        if columns.is_empty() {
            return Err(MappingError::metadata("index", "an index needs at least one column"));
        }
        for (field, len) in [
            ("operators", self.operators.len()),
            ("collations", self.collations.len()),
            ("sort_order", self.sort_order.len()),
            ("null_sort_order", self.null_sort_order.len()),
        ] {
            if len != 0 && len != columns.len() {
                return Err(MappingError::metadata(
                    "index",
                    format!("{} has {} entries for {} columns", field, len, columns.len()),
                ));
            }
        }

        if self.method != IndexMethod::Btree
            && (!self.sort_order.is_empty() || !self.null_sort_order.is_empty())
        {
            return Err(MappingError::metadata(
                "index",
                format!("sort order is only supported by btree, not {}", self.method),
            ));
        }

        if !self.include.is_empty() {
            if !self.method.supports_include() {
                return Err(MappingError::metadata(
                    "index",
                    format!("{} indexes do not support INCLUDE", self.method),
                ));
            }
            let keys: HashSet<&str> = columns.iter().map(String::as_str).collect();
            if let Some(dup) = self.include.iter().find(|c| keys.contains(c.as_str())) {
                return Err(MappingError::metadata(
                    "index",
                    format!("included column '{}' is also a key column", dup),
                ));
            }
        }

        if self.nulls_distinct == Some(false) && !version.supports_nulls_distinct() {
            return Err(MappingError::metadata(
                "index",
                format!("NULLS NOT DISTINCT requires PostgreSQL 15, configured {}", version),
            ));
        }

        check_fill_factor("index", self.fill_factor)
    }

    /// One key column with its collation, operator class and ordering.
    fn column_sql(&self, i: usize, column: &str) -> Result<String> {
        let mut out = quote_identifier(column)?;
        if let Some(Some(collation)) = self.collations.get(i) {
            out.push_str(&format!(" COLLATE {}", quote_identifier(collation)?));
        }
        if let Some(Some(operator)) = self.operators.get(i) {
            out.push(' ');
            out.push_str(operator);
        }
        if let Some(SortOrder::Descending) = self.sort_order.get(i) {
            out.push_str(" DESC");
        }
        match self.null_sort_order.get(i) {
            Some(NullSortOrder::NullsFirst) => out.push_str(" NULLS FIRST"),
            Some(NullSortOrder::NullsLast) => out.push_str(" NULLS LAST"),
            None => {}
        }
        Ok(out)
    }

    /// Full `CREATE INDEX` statement.
    pub fn create_statement(
        &self,
        name: &str,
        schema: Option<&str>,
        table: &str,
        columns: &[String],
        unique: bool,
        version: PostgresVersion,
    ) -> Result<String> {
        self.validate(columns, version)?;

        let keys = columns
            .iter()
            .enumerate()
            .map(|(i, c)| self.column_sql(i, c))
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!(
            "CREATE {}INDEX {}{} ON {}",
            if unique { "UNIQUE " } else { "" },
            if self.created_concurrently { "CONCURRENTLY " } else { "" },
            quote_identifier(name)?,
            qualify(schema, table)?
        );
        if self.method != IndexMethod::Btree {
            sql.push_str(&format!(" USING {}", self.method));
        }
        sql.push_str(&format!(" ({})", keys.join(", ")));
        if !self.include.is_empty() {
            sql.push_str(&format!(" INCLUDE ({})", quote_all(&self.include)?));
        }
        if self.nulls_distinct == Some(false) {
            sql.push_str(" NULLS NOT DISTINCT");
        }
        if let Some(f) = self.fill_factor {
            sql.push_str(&format!(" WITH (fillfactor={})", f));
        }
        Ok(sql)
    }
}
