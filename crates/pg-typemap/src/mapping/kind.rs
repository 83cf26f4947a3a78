//! The immutable [`ValueKind`] entity.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::comparer::{FixedCharValueComparer, ScalarValueComparer, SharedComparer};
use crate::core::{ClrShape, DialectTag, Value};
use crate::error::{MappingError, Result};
use crate::literal::{EnumFormatter, FormatterImpl, LiteralFormatter, NameTranslation};

use super::collection;
use super::converter::ValueConverter;
use super::store_type::{self, Facets};

/// Family discriminant with family-specific payload.
#[derive(Debug, Clone)]
pub enum KindFamily {
    Scalar(FormatterImpl),
    Enum(EnumFormatter),
    /// Array with its element kind.
    Array(Box<ValueKind>),
    /// Growable list with its element kind; same store type as the array.
    List(Box<ValueKind>),
    /// Range with its subtype kind.
    Range(Box<ValueKind>),
    /// Multirange with its range kind.
    Multirange(Box<ValueKind>),
    Hstore,
}

impl KindFamily {
    pub fn name(&self) -> &str {
        match self {
            KindFamily::Scalar(f) => f.family(),
            KindFamily::Enum(_) => "enum",
            KindFamily::Array(_) => "array",
            KindFamily::List(_) => "list",
            KindFamily::Range(_) => "range",
            KindFamily::Multirange(_) => "multirange",
            KindFamily::Hstore => "hstore",
        }
    }
}

/// Binds a logical in-memory shape to a PostgreSQL store type.
///
/// A kind knows how to render its values as SQL literals, which wire tag its
/// parameters carry, and how change tracking compares its values. Kinds are
/// immutable: `with_*` methods return new instances.
#[derive(Clone)]
pub struct ValueKind {
    pub(super) store_type: String,
    pub(super) base_store_type: String,
    pub(super) clr_shape: ClrShape,
    pub(super) dialect_tag: DialectTag,
    pub(super) facets: Facets,
    pub(super) family: KindFamily,
    pub(super) comparer: SharedComparer,
    pub(super) converter: Option<ValueConverter>,
    pub(super) data_type_name: Option<String>,
}

impl ValueKind {
    /// A scalar kind rendered by `formatter`.
    ///
    /// `store_type` is a canonical base name without facets; use
    /// [`with_facets`](Self::with_facets) to add them.
    pub fn scalar(
        store_type: impl Into<String>,
        clr_shape: ClrShape,
        dialect_tag: DialectTag,
        formatter: FormatterImpl,
    ) -> Self {
        let store_type = store_type.into();
        let comparer: SharedComparer = if dialect_tag == DialectTag::Char {
            Arc::new(FixedCharValueComparer)
        } else {
            Arc::new(ScalarValueComparer)
        };
        Self {
            base_store_type: store_type.clone(),
            store_type,
            clr_shape,
            dialect_tag,
            facets: Facets::default(),
            family: KindFamily::Scalar(formatter),
            comparer,
            converter: None,
            data_type_name: None,
        }
    }

    /// A user enum kind. The store type doubles as the parameter's data type name.
    pub fn enumeration(
        store_type: impl Into<String>,
        labels: Vec<String>,
        translation: NameTranslation,
    ) -> Self {
        let store_type = store_type.into();
        Self {
            base_store_type: store_type.clone(),
            clr_shape: ClrShape::Enum(store_type.clone()),
            dialect_tag: DialectTag::Unknown,
            facets: Facets::default(),
            family: KindFamily::Enum(EnumFormatter::new(labels, translation)),
            comparer: Arc::new(ScalarValueComparer),
            converter: None,
            data_type_name: Some(store_type.clone()),
            store_type,
        }
    }

    /// Full store type, facets included (e.g. `character varying(20)`).
    #[must_use]
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    /// Store type without facets.
    #[must_use]
    pub fn base_store_type(&self) -> &str {
        &self.base_store_type
    }

    #[must_use]
    pub fn clr_shape(&self) -> &ClrShape {
        &self.clr_shape
    }

    #[must_use]
    pub fn dialect_tag(&self) -> &DialectTag {
        &self.dialect_tag
    }

    #[must_use]
    pub fn facets(&self) -> Facets {
        self.facets
    }

    #[must_use]
    pub fn size(&self) -> Option<u32> {
        self.facets.size
    }

    #[must_use]
    pub fn precision(&self) -> Option<u32> {
        self.facets.precision
    }

    #[must_use]
    pub fn scale(&self) -> Option<u32> {
        self.facets.scale
    }

    #[must_use]
    pub fn family(&self) -> &KindFamily {
        &self.family
    }

    /// Element kind of an array or list, subtype of a range, range of a multirange.
    #[must_use]
    pub fn element(&self) -> Option<&ValueKind> {
        match &self.family {
            KindFamily::Array(e)
            | KindFamily::List(e)
            | KindFamily::Range(e)
            | KindFamily::Multirange(e) => Some(e),
            _ => None,
        }
    }

    /// Data type name drivers need to resolve the type (enums only).
    #[must_use]
    pub fn data_type_name(&self) -> Option<&str> {
        self.data_type_name.as_deref()
    }

    #[must_use]
    pub fn comparer(&self) -> &SharedComparer {
        &self.comparer
    }

    #[must_use]
    pub fn converter(&self) -> Option<&ValueConverter> {
        self.converter.as_ref()
    }

    /// True for blank-padded `character(n)`.
    #[must_use]
    pub fn is_fixed_length(&self) -> bool {
        self.dialect_tag == DialectTag::Char
    }

    /// True for text kinds whose size facet constrains parameter values.
    #[must_use]
    pub fn is_sized_text(&self) -> bool {
        matches!(self.dialect_tag, DialectTag::Char | DialectTag::Varchar)
            && self.facets.size.is_some()
    }

    /// Same kind under a different store type name.
    ///
    /// Literals cast to the new name; for arrays and lists pass the full
    /// array name (`int4[]`).
    pub fn with_store_type(&self, store_type: impl Into<String>, size: Option<u32>) -> Self {
        let store_type = store_type.into();
        let mut kind = self.clone();
        kind.base_store_type = store_type::parse(&store_type)
            .map(|parsed| parsed.base)
            .unwrap_or_else(|_| store_type.clone());
        kind.store_type = store_type;
        kind.facets.size = size;
        kind
    }

    /// Same kind with new facets; the store type name is re-rendered.
    ///
    /// Array and list kinds pass the facets down to their element.
    pub fn with_facets(
        &self,
        size: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Self {
        match &self.family {
            KindFamily::Array(element) => {
                let kind = ValueKind::array(element.with_facets(size, precision, scale));
                self.carry_converter(kind)
            }
            KindFamily::List(element) => {
                let kind = ValueKind::list(element.with_facets(size, precision, scale));
                self.carry_converter(kind)
            }
            _ => {
                let mut kind = self.clone();
                kind.facets = Facets {
                    size,
                    precision,
                    scale,
                };
                kind.store_type = store_type::render(&kind.base_store_type, &kind.facets);
                kind
            }
        }
    }

    fn carry_converter(&self, mut kind: ValueKind) -> ValueKind {
        if let Some(converter) = &self.converter {
            kind.clr_shape = converter.model_shape().clone();
            kind.converter = Some(converter.clone());
        }
        kind
    }

    /// Same kind behind a value converter.
    ///
    /// The kind's shape becomes the converter's model shape. An existing converter
    /// runs after the new one on the way to the provider.
    pub fn with_value_converter(&self, converter: ValueConverter) -> Self {
        let composed = match &self.converter {
            Some(existing) => converter.then(existing),
            None => converter,
        };
        let mut kind = self.clone();
        kind.clr_shape = composed.model_shape().clone();
        kind.converter = Some(composed);
        kind
    }

    /// Same kind with a different comparer.
    pub fn with_comparer(&self, comparer: SharedComparer) -> Self {
        let mut kind = self.clone();
        kind.comparer = comparer;
        kind
    }

    /// Apply the converter (if any) on the way to the database.
    pub fn to_provider<'a>(&self, value: &'a Value) -> Result<Cow<'a, Value>> {
        match &self.converter {
            Some(c) => c.to_provider(value),
            None => Ok(Cow::Borrowed(value)),
        }
    }

    /// Apply the converter (if any) on the way back from the database.
    pub fn from_provider<'a>(&self, value: &'a Value) -> Result<Cow<'a, Value>> {
        match &self.converter {
            Some(c) => c.from_provider(value),
            None => Ok(Cow::Borrowed(value)),
        }
    }

    /// Standalone SQL literal for `value`. NULL renders as `NULL`.
    pub fn generate_literal(&self, value: &Value) -> Result<String> {
        let value = self.to_provider(value)?;
        if value.is_null() {
            return Ok("NULL".into());
        }
        match &self.family {
            KindFamily::Scalar(f) => f.format(&value, &self.store_type),
            KindFamily::Enum(f) => f.format(&value, &self.store_type),
            KindFamily::Array(element) | KindFamily::List(element) => {
                collection::format_array(element, &value, &self.store_type)
            }
            KindFamily::Range(subtype) => {
                collection::format_range(subtype, &value, &self.store_type)
            }
            KindFamily::Multirange(range) => {
                collection::format_multirange(range, &value, &self.store_type)
            }
            KindFamily::Hstore => collection::format_hstore(&value),
        }
    }

    /// Literal fragment for nesting inside a range or multirange literal.
    pub fn generate_embedded_literal(&self, value: &Value) -> Result<String> {
        let value = self.to_provider(value)?;
        if value.is_null() {
            return Ok("NULL".into());
        }
        match &self.family {
            KindFamily::Scalar(f) => f.format_embedded(&value, &self.store_type),
            KindFamily::Enum(f) => f.format_embedded(&value, &self.store_type),
            KindFamily::Range(subtype) => collection::embedded_range(subtype, &value),
            KindFamily::Multirange(range) => collection::embedded_multirange(range, &value),
            KindFamily::Array(_) | KindFamily::List(_) | KindFamily::Hstore => {
                self.generate_literal(&value)
            }
        }
    }

    /// Parse a literal produced by [`generate_literal`](Self::generate_literal).
    ///
    /// Supported for scalar, enum, array, list and hstore kinds.
    pub fn parse_literal(&self, literal: &str) -> Result<Value> {
        if literal.trim().eq_ignore_ascii_case("NULL") {
            return Ok(Value::Null);
        }
        let value = match &self.family {
            KindFamily::Scalar(f) => f.parse(literal, &self.store_type)?,
            KindFamily::Enum(f) => f.parse(literal, &self.store_type)?,
            KindFamily::Array(element) => collection::parse_array(element, literal, false)?,
            KindFamily::List(element) => collection::parse_array(element, literal, true)?,
            KindFamily::Hstore => collection::parse_hstore(literal)?,
            KindFamily::Range(_) | KindFamily::Multirange(_) => {
                return Err(MappingError::invalid_literal(&self.store_type, literal))
            }
        };
        Ok(self.from_provider(&value)?.into_owned())
    }

    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        self.comparer.equals(a, b)
    }

    pub fn hash(&self, value: &Value) -> u64 {
        self.comparer.hash(value)
    }

    pub fn snapshot(&self, value: &Value) -> Value {
        self.comparer.snapshot(value)
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueKind")
            .field("store_type", &self.store_type)
            .field("clr_shape", &self.clr_shape)
            .field("dialect_tag", &self.dialect_tag)
            .field("facets", &self.facets)
            .field("family", &self.family.name())
            .field("converter", &self.converter)
            .finish()
    }
}
