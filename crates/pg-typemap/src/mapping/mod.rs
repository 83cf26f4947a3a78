//! Value kinds: the binding between an in-memory shape and a PostgreSQL store type.
//!
//! A [`ValueKind`] is immutable. Facets, store type names and value converters are
//! changed by cloning into a new kind, so kinds can be shared freely once a
//! registry hands them out.

mod collection;
mod converter;
mod kind;
pub mod store_type;

pub use converter::ValueConverter;
pub use kind::{KindFamily, ValueKind};
pub use store_type::{Facets, StoreTypeName};
