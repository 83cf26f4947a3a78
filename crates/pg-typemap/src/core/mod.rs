//! Core value types shared by every other module.
//!
//! - [`value`]: decoded in-memory values, including collections and ranges
//! - [`shape`]: the logical shape a value kind decodes to
//! - [`tag`]: wire-level type tags placed on configured parameters
//!
//! Nothing here knows about store type names or literal syntax; that lives in
//! [`mapping`](crate::mapping) and [`literal`](crate::literal).

pub mod shape;
pub mod tag;
pub mod value;

// Re-export commonly used types for convenience
pub use shape::ClrShape;
pub use tag::DialectTag;
pub use value::{
    ArrayValue, BitString, Circle, DateTimeKind, DateTimeValue, IpNetwork, Line, LineSegment,
    MacAddress, Path, PgBox, PgRange, Point, Polygon, Value,
};
