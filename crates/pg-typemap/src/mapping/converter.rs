//! Value converters layered on top of a physical value kind.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::core::{ClrShape, Value};
use crate::error::Result;

type ConvertFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Converts between a model value and the value a kind stores.
///
/// NULL passes through both directions untouched.
#[derive(Clone)]
pub struct ValueConverter {
    model_shape: ClrShape,
    provider_shape: ClrShape,
    to_provider: ConvertFn,
    from_provider: ConvertFn,
}

impl ValueConverter {
    pub fn new<T, F>(
        model_shape: ClrShape,
        provider_shape: ClrShape,
        to_provider: T,
        from_provider: F,
    ) -> Self
    where
        T: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            model_shape,
            provider_shape,
            to_provider: Arc::new(to_provider),
            from_provider: Arc::new(from_provider),
        }
    }

    #[must_use]
    pub fn model_shape(&self) -> &ClrShape {
        &self.model_shape
    }

    #[must_use]
    pub fn provider_shape(&self) -> &ClrShape {
        &self.provider_shape
    }

    pub fn to_provider<'a>(&self, value: &'a Value) -> Result<Cow<'a, Value>> {
        if value.is_null() {
            return Ok(Cow::Borrowed(value));
        }
        (self.to_provider)(value).map(Cow::Owned)
    }

    pub fn from_provider<'a>(&self, value: &'a Value) -> Result<Cow<'a, Value>> {
        if value.is_null() {
            return Ok(Cow::Borrowed(value));
        }
        (self.from_provider)(value).map(Cow::Owned)
    }

    /// Compose: `self` runs first on the way to the provider, `inner` second.
    pub fn then(&self, inner: &ValueConverter) -> ValueConverter {
        let (outer_to, inner_to) = (self.to_provider.clone(), inner.to_provider.clone());
        let (outer_from, inner_from) = (self.from_provider.clone(), inner.from_provider.clone());
        ValueConverter {
            model_shape: self.model_shape.clone(),
            provider_shape: inner.provider_shape.clone(),
            to_provider: Arc::new(move |v: &Value| {
                let mid = outer_to(v)?;
                if mid.is_null() {
                    return Ok(mid);
                }
                inner_to(&mid)
            }),
            from_provider: Arc::new(move |v: &Value| {
                let mid = inner_from(v)?;
                if mid.is_null() {
                    return Ok(mid);
                }
                outer_from(&mid)
            }),
        }
    }
}

impl fmt::Debug for ValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueConverter")
            .field("model_shape", &self.model_shape)
            .field("provider_shape", &self.provider_shape)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MappingError;

    fn cents_to_units() -> ValueConverter {
        ValueConverter::new(
            ClrShape::Named("Cents".into()),
            ClrShape::I64,
            |v| match v {
                Value::I64(c) => Ok(Value::I64(c / 100)),
                other => Err(MappingError::Conversion(format!("expected cents, got {:?}", other))),
            },
            |v| match v {
                Value::I64(u) => Ok(Value::I64(u * 100)),
                other => Err(MappingError::Conversion(format!("expected units, got {:?}", other))),
            },
        )
    }

    fn i64_to_text() -> ValueConverter {
        ValueConverter::new(
            ClrShape::I64,
            ClrShape::String,
            |v| match v {
                Value::I64(n) => Ok(Value::Text(n.to_string())),
                other => Err(MappingError::Conversion(format!("{:?}", other))),
            },
            |v| match v {
                Value::Text(s) => s
                    .parse()
                    .map(Value::I64)
                    .map_err(|_| MappingError::Conversion(s.clone())),
                other => Err(MappingError::Conversion(format!("{:?}", other))),
            },
        )
    }

    #[test]
    fn test_null_passes_through() {
        let c = cents_to_units();
        assert!(c.to_provider(&Value::Null).unwrap().is_null());
        assert!(c.from_provider(&Value::Null).unwrap().is_null());
    }

    #[test]
    fn test_composition_order() {
        let composed = cents_to_units().then(&i64_to_text());
        assert_eq!(composed.model_shape(), &ClrShape::Named("Cents".into()));
        assert_eq!(composed.provider_shape(), &ClrShape::String);
        assert_eq!(
            composed.to_provider(&Value::I64(1234)).unwrap().into_owned(),
            Value::Text("12".into())
        );
        assert_eq!(
            composed
                .from_provider(&Value::Text("12".into()))
                .unwrap()
                .into_owned(),
            Value::I64(1200)
        );
    }
}
