//! Binding value kinds to outgoing command parameters.
//!
//! [`configure`] is the single entry point: it runs the kind's value converter,
//! stores the value and copies the wire-level settings (dialect tag, data type
//! name, facets) onto anything implementing [`BoundParameter`].

use tracing::trace;

use crate::core::{DialectTag, Value};
use crate::error::Result;
use crate::mapping::ValueKind;

/// A driver parameter that a [`ValueKind`] can configure.
pub trait BoundParameter {
    fn set_value(&mut self, value: Value);

    /// Wire type the driver should send.
    fn set_dialect_tag(&mut self, tag: DialectTag);

    /// Type name for types without a built-in tag (enums).
    fn set_data_type_name(&mut self, name: &str);

    fn set_size(&mut self, size: Option<u32>);

    fn set_precision(&mut self, precision: Option<u32>);

    fn set_scale(&mut self, scale: Option<u32>);
}

/// A plain in-memory parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbParameter {
    pub name: String,
    pub value: Option<Value>,
    pub dialect_tag: Option<DialectTag>,
    pub data_type_name: Option<String>,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl DbParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl BoundParameter for DbParameter {
    fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    fn set_dialect_tag(&mut self, tag: DialectTag) {
        self.dialect_tag = Some(tag);
    }

    fn set_data_type_name(&mut self, name: &str) {
        self.data_type_name = Some(name.to_string());
    }

    fn set_size(&mut self, size: Option<u32>) {
        self.size = size;
    }

    fn set_precision(&mut self, precision: Option<u32>) {
        self.precision = precision;
    }

    fn set_scale(&mut self, scale: Option<u32>) {
        self.scale = scale;
    }
}

/// Configure `parameter` to carry `value` as `kind`.
///
/// For sized text kinds the size is set to the kind's width only when the value
/// fits; a NULL or an oversized value leaves the size unset. Calling this twice
/// with the same arguments gives the same parameter.
pub fn configure<P: BoundParameter + ?Sized>(
    parameter: &mut P,
    value: &Value,
    kind: &ValueKind,
) -> Result<()> {
    let mut value = kind.to_provider(value)?.into_owned();
    if kind.is_fixed_length() {
        if let Value::Text(s) = &mut value {
            let len = s.trim_end().len();
            s.truncate(len);
        }
    }

    parameter.set_dialect_tag(kind.dialect_tag().clone());
    if let Some(name) = kind.data_type_name() {
        parameter.set_data_type_name(name);
    }
    parameter.set_precision(kind.precision());
    parameter.set_scale(kind.scale());
    if kind.is_sized_text() {
        let size = match (&value, kind.size()) {
            (Value::Text(s), Some(width)) if s.chars().count() <= width as usize => Some(width),
            _ => None,
        };
        parameter.set_size(size);
    }

    trace!(
        "Configured parameter as '{}' ({})",
        kind.store_type(),
        kind.dialect_tag()
    );
    parameter.set_value(value);
    Ok(())
}
