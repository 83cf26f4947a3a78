//! # pg-typemap
//!
//! PostgreSQL type mapping library for ORM providers.
//!
//! This library maps in-memory value shapes to PostgreSQL store types and back,
//! with support for:
//!
//! - **Literal generation** for every built-in type, including special values
//!   (`NaN`, `infinity`, date-time extremes)
//! - **Collections**: arrays, lists, ranges, multiranges and `hstore`
//! - **Change tracking comparers** with equality, hashing and snapshots
//! - **Parameter configuration** with wire tags, sizes and precision
//! - **Schema options** for tables, indexes, keys and columns
//!
//! ## Example
//!
//! ```rust
//! use pg_typemap::{ClrShape, Config, Value, ValueKindRegistry};
//!
//! let registry = ValueKindRegistry::with_builtins(&Config::default())?;
//! let kind = registry.resolve(&ClrShape::array_of(ClrShape::I32), None)?;
//! let sql = kind.generate_literal(&Value::array(vec![Value::I32(1), Value::I32(2)]))?;
//! assert_eq!(sql, "ARRAY[1,2]::integer[]");
//! # Ok::<(), pg_typemap::MappingError>(())
//! ```

pub mod comparer;
pub mod config;
pub mod core;
pub mod error;
pub mod literal;
pub mod mapping;
pub mod metadata;
pub mod parameter;
pub mod registry;

// Re-exports for convenient access
pub use comparer::{SharedComparer, ValueComparer};
pub use config::{Config, EnumConfig, PostgresVersion, RangeConfig};
pub use core::{ClrShape, DialectTag, PgRange, Value};
pub use error::{MappingError, Result};
pub use literal::LiteralFormatter;
pub use mapping::{ValueConverter, ValueKind};
pub use parameter::{configure, BoundParameter, DbParameter};
pub use registry::ValueKindRegistry;
