//! Collection kinds: arrays, lists, ranges, multiranges and `hstore`.
//!
//! Every collection kind wraps exactly one element kind (the `hstore` key/value
//! pair is fixed to nullable text) and delegates literal rendering and comparison
//! to it recursively.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::comparer::{
    HstoreValueComparer, MultirangeValueComparer, RangeValueComparer, SequenceValueComparer,
};
use crate::core::{ArrayValue, ClrShape, DialectTag, PgRange, Value};
use crate::error::{MappingError, Result};
use crate::literal::{quote_embedded, strip_keyword, unquote};

use super::kind::{KindFamily, ValueKind};
use super::store_type::Facets;

impl ValueKind {
    /// `element[]` holding an [`ArrayValue`].
    pub fn array(element: ValueKind) -> Self {
        Self::sequence(element, false)
    }

    /// `element[]` holding a growable list.
    pub fn list(element: ValueKind) -> Self {
        Self::sequence(element, true)
    }

    fn sequence(element: ValueKind, list: bool) -> Self {
        let element_shape = Box::new(element.clr_shape().clone());
        let clr_shape = if list {
            ClrShape::List(element_shape)
        } else {
            ClrShape::Array(element_shape)
        };
        let comparer = Arc::new(SequenceValueComparer::new(element.comparer().clone()));
        let data_type_name = element.data_type_name().map(|name| format!("{}[]", name));
        let element = Box::new(element);
        Self {
            store_type: format!("{}[]", element.store_type()),
            base_store_type: format!("{}[]", element.base_store_type()),
            clr_shape,
            dialect_tag: DialectTag::array_of(element.dialect_tag().clone()),
            facets: Facets::default(),
            comparer,
            converter: None,
            data_type_name,
            family: if list {
                KindFamily::List(element)
            } else {
                KindFamily::Array(element)
            },
        }
    }

    /// A range type such as `int4range` over `subtype`.
    pub fn range(store_type: impl Into<String>, subtype: ValueKind) -> Self {
        let store_type = store_type.into();
        let comparer = Arc::new(RangeValueComparer::new(subtype.comparer().clone()));
        Self {
            base_store_type: store_type.clone(),
            store_type,
            clr_shape: ClrShape::range_of(subtype.clr_shape().clone()),
            dialect_tag: DialectTag::range_of(subtype.dialect_tag().clone()),
            facets: Facets::default(),
            comparer,
            converter: None,
            data_type_name: None,
            family: KindFamily::Range(Box::new(subtype)),
        }
    }

    /// A multirange type over an existing range kind.
    pub fn multirange(store_type: impl Into<String>, range: ValueKind) -> Result<Self> {
        let store_type = store_type.into();
        let subtype = match range.family() {
            KindFamily::Range(subtype) => subtype,
            _ => return Err(MappingError::InvalidStoreType(range.store_type().to_string())),
        };
        let comparer = Arc::new(MultirangeValueComparer::new(RangeValueComparer::new(
            subtype.comparer().clone(),
        )));
        Ok(Self {
            base_store_type: store_type.clone(),
            store_type,
            clr_shape: ClrShape::multirange_of(subtype.clr_shape().clone()),
            dialect_tag: DialectTag::multirange_of(subtype.dialect_tag().clone()),
            facets: Facets::default(),
            comparer,
            converter: None,
            data_type_name: None,
            family: KindFamily::Multirange(Box::new(range)),
        })
    }

    /// The `hstore` extension type.
    pub fn hstore() -> Self {
        Self {
            store_type: "hstore".into(),
            base_store_type: "hstore".into(),
            clr_shape: ClrShape::hstore(),
            dialect_tag: DialectTag::Hstore,
            facets: Facets::default(),
            family: KindFamily::Hstore,
            comparer: Arc::new(HstoreValueComparer::new()),
            converter: None,
            data_type_name: None,
        }
    }
}

fn sequence_items(value: &Value) -> Result<&[Value]> {
    match value {
        Value::Array(array) if array.rank() != 1 => {
            Err(MappingError::UnsupportedRank { rank: array.rank() })
        }
        Value::Array(array) => Ok(array.elements()),
        Value::List(items) => Ok(items),
        other => Err(MappingError::unsupported_shape("array", other.shape())),
    }
}

/// `ARRAY[e0,e1]::element[]`, cast to the array kind's own store type.
pub(super) fn format_array(element: &ValueKind, value: &Value, store_type: &str) -> Result<String> {
    let items = sequence_items(value)?;
    let rendered = items
        .iter()
        .map(|item| element.generate_literal(item))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("ARRAY[{}]::{}", rendered.join(","), store_type))
}

/// Split on commas that are outside quotes and brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '(' | '[' | '{' if !in_quote => depth += 1,
            ')' | ']' | '}' if !in_quote => depth -= 1,
            ',' if !in_quote && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

pub(super) fn parse_array(element: &ValueKind, literal: &str, list: bool) -> Result<Value> {
    let invalid = || MappingError::invalid_literal(format!("{}[]", element.store_type()), literal);
    let trimmed = literal.trim();
    let body = trimmed
        .get(..6)
        .filter(|head| head.eq_ignore_ascii_case("ARRAY["))
        .map(|_| &trimmed[6..])
        .ok_or_else(invalid)?;
    let end = body.rfind("]::").ok_or_else(invalid)?;
    let inner = body[..end].trim();

    let items = if inner.is_empty() {
        Vec::new()
    } else {
        split_top_level(inner)
            .into_iter()
            .map(|part| element.parse_literal(part.trim()))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(if list {
        Value::List(items)
    } else {
        Value::Array(ArrayValue::new(items))
    })
}

fn embedded_bound(subtype: &ValueKind, bound: &Bound<Value>) -> Result<String> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) if !v.is_null() => {
            subtype.generate_embedded_literal(v)
        }
        _ => Ok(String::new()),
    }
}

fn embedded_pg_range(subtype: &ValueKind, range: &PgRange) -> Result<String> {
    match range {
        PgRange::Empty => Ok("empty".into()),
        PgRange::Span { lower, upper } => {
            let open = match lower {
                Bound::Included(v) if !v.is_null() => '[',
                _ => '(',
            };
            let close = match upper {
                Bound::Included(v) if !v.is_null() => ']',
                _ => ')',
            };
            Ok(format!(
                "{}{},{}{}",
                open,
                embedded_bound(subtype, lower)?,
                embedded_bound(subtype, upper)?,
                close
            ))
        }
    }
}

/// `[lower,upper)` without outer quotes or cast.
pub(super) fn embedded_range(subtype: &ValueKind, value: &Value) -> Result<String> {
    match value {
        Value::Range(range) => embedded_pg_range(subtype, range),
        other => Err(MappingError::unsupported_shape("range", other.shape())),
    }
}

/// `'[lower,upper)'::int4range`.
pub(super) fn format_range(subtype: &ValueKind, value: &Value, store_type: &str) -> Result<String> {
    Ok(format!("'{}'::{}", embedded_range(subtype, value)?, store_type))
}

/// `{[1,3),[5,7)}` without outer quotes or cast.
pub(super) fn embedded_multirange(range: &ValueKind, value: &Value) -> Result<String> {
    let subtype = range
        .element()
        .ok_or_else(|| MappingError::InvalidStoreType(range.store_type().to_string()))?;
    match value {
        Value::Multirange(ranges) => {
            let rendered = ranges
                .iter()
                .map(|r| embedded_pg_range(subtype, r))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{{}}}", rendered.join(",")))
        }
        other => Err(MappingError::unsupported_shape("multirange", other.shape())),
    }
}

/// `'{[1,3),[5,7)}'::int4multirange`.
pub(super) fn format_multirange(range: &ValueKind, value: &Value, store_type: &str) -> Result<String> {
    Ok(format!("'{}'::{}", embedded_multirange(range, value)?, store_type))
}

/// `HSTORE '"key"=>"value","k2"=>NULL'`.
pub(super) fn format_hstore(value: &Value) -> Result<String> {
    match value {
        Value::Map(map) => {
            let pairs = map
                .iter()
                .map(|(k, v)| match v {
                    Some(v) => format!("{}=>{}", quote_embedded(k), quote_embedded(v)),
                    None => format!("{}=>NULL", quote_embedded(k)),
                })
                .collect::<Vec<_>>();
            Ok(format!("HSTORE '{}'", pairs.join(",")))
        }
        other => Err(MappingError::unsupported_shape("hstore", other.shape())),
    }
}

/// Cursor over the body of an hstore literal, after the outer quotes are removed.
struct HstoreCursor<'a> {
    rest: &'a str,
}

impl<'a> HstoreCursor<'a> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn eat_null(&mut self) -> bool {
        match self.rest.get(..4) {
            Some(head) if head.eq_ignore_ascii_case("NULL") => {
                self.rest = &self.rest[4..];
                true
            }
            _ => false,
        }
    }

    /// A double-quoted string with backslash escapes.
    fn quoted(&mut self) -> Option<String> {
        let body = self.rest.strip_prefix('"')?;
        let mut out = String::new();
        let mut chars = body.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => out.push(chars.next()?.1),
                '"' => {
                    self.rest = &body[i + 1..];
                    return Some(out);
                }
                _ => out.push(c),
            }
        }
        None
    }
}

pub(super) fn parse_hstore(literal: &str) -> Result<Value> {
    let invalid = || MappingError::invalid_literal("hstore", literal);
    let body = strip_keyword(literal, "HSTORE")
        .and_then(unquote)
        .ok_or_else(invalid)?;

    let mut map = BTreeMap::new();
    let mut cursor = HstoreCursor { rest: &body };
    cursor.skip_ws();
    while !cursor.rest.is_empty() {
        let key = cursor.quoted().ok_or_else(invalid)?;
        cursor.skip_ws();
        if !cursor.eat("=>") {
            return Err(invalid());
        }
        cursor.skip_ws();
        let value = if cursor.eat_null() {
            None
        } else {
            Some(cursor.quoted().ok_or_else(invalid)?)
        };
        map.insert(key, value);
        cursor.skip_ws();
        if !cursor.eat(",") && !cursor.rest.is_empty() {
            return Err(invalid());
        }
        cursor.skip_ws();
    }
    Ok(Value::Map(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::literal::{
        DateFormatter, FormatterImpl, IntegerFormatter, IntervalFormatter, TextFormatter,
        TimestampFormatter,
    };

    fn integer() -> ValueKind {
        ValueKind::scalar(
            "integer",
            ClrShape::I32,
            DialectTag::Integer,
            FormatterImpl::Integer(IntegerFormatter::integer()),
        )
    }

    fn text() -> ValueKind {
        ValueKind::scalar(
            "text",
            ClrShape::String,
            DialectTag::Text,
            FormatterImpl::Text(TextFormatter),
        )
    }

    #[test]
    fn test_array_kind_shape_and_tag() {
        let kind = ValueKind::array(integer());
        assert_eq!(kind.store_type(), "integer[]");
        assert_eq!(kind.clr_shape(), &ClrShape::array_of(ClrShape::I32));
        assert_eq!(kind.dialect_tag(), &DialectTag::array_of(DialectTag::Integer));

        let list = ValueKind::list(integer());
        assert_eq!(list.store_type(), "integer[]");
        assert_eq!(list.clr_shape(), &ClrShape::list_of(ClrShape::I32));
    }

    #[test]
    fn test_array_literal_with_nulls() {
        let kind = ValueKind::array(text());
        let value = Value::array(vec![Value::Text("a'b".into()), Value::Null]);
        let literal = kind.generate_literal(&value).unwrap();
        assert_eq!(literal, "ARRAY['a''b',NULL]::text[]");
        assert_eq!(kind.parse_literal(&literal).unwrap(), value);
    }

    #[test]
    fn test_empty_array_and_list() {
        let kind = ValueKind::array(integer());
        assert_eq!(
            kind.generate_literal(&Value::array(vec![])).unwrap(),
            "ARRAY[]::integer[]"
        );
        let list = ValueKind::list(integer());
        assert_eq!(
            list.parse_literal("ARRAY[]::integer[]").unwrap(),
            Value::List(vec![])
        );
    }

    #[test]
    fn test_array_of_intervals_recurses() {
        let interval = ValueKind::scalar(
            "interval",
            ClrShape::TimeSpan,
            DialectTag::Interval,
            FormatterImpl::Interval(IntervalFormatter),
        );
        let kind = ValueKind::array(interval);
        let value = Value::array(vec![Value::Interval(chrono::TimeDelta::hours(26))]);
        assert_eq!(
            kind.generate_literal(&value).unwrap(),
            "ARRAY[INTERVAL '1 02:00:00']::interval[]"
        );
    }

    #[test]
    fn test_renamed_array_casts_to_new_name() {
        let kind = ValueKind::array(integer()).with_store_type("int4[]", None);
        assert_eq!(kind.store_type(), "int4[]");
        let literal = kind
            .generate_literal(&Value::array(vec![Value::I32(1), Value::I32(2)]))
            .unwrap();
        assert_eq!(literal, "ARRAY[1,2]::int4[]");
        assert_eq!(
            kind.parse_literal(&literal).unwrap(),
            Value::array(vec![Value::I32(1), Value::I32(2)])
        );
    }

    #[test]
    fn test_multidimensional_array_rejected() {
        let kind = ValueKind::array(integer());
        let value = Value::Array(
            ArrayValue::with_dimensions(vec![2, 2], vec![Value::I32(1); 4]).unwrap(),
        );
        let err = kind.generate_literal(&value).unwrap_err();
        assert!(matches!(err, MappingError::UnsupportedRank { rank: 2 }));
    }

    #[test]
    fn test_element_shape_mismatch() {
        let kind = ValueKind::array(integer());
        let err = kind
            .generate_literal(&Value::array(vec![Value::Text("x".into())]))
            .unwrap_err();
        assert!(matches!(err, MappingError::UnsupportedLiteralShape { .. }));
    }

    #[test]
    fn test_range_literals() {
        let kind = ValueKind::range("int4range", integer());
        assert_eq!(kind.dialect_tag(), &DialectTag::range_of(DialectTag::Integer));
        assert_eq!(
            kind.generate_literal(&Value::range(PgRange::closed_open(1, 5)))
                .unwrap(),
            "'[1,5)'::int4range"
        );
        assert_eq!(
            kind.generate_literal(&Value::range(PgRange::Empty)).unwrap(),
            "'empty'::int4range"
        );
        let half_open = PgRange::Span {
            lower: Bound::Unbounded,
            upper: Bound::Included(Value::I32(3)),
        };
        assert_eq!(
            kind.generate_literal(&Value::range(half_open)).unwrap(),
            "'(,3]'::int4range"
        );
    }

    #[test]
    fn test_timestamp_range_uses_embedded_bounds() {
        let ts = ValueKind::scalar(
            "timestamp without time zone",
            ClrShape::DateTime,
            DialectTag::Timestamp,
            FormatterImpl::Timestamp(TimestampFormatter::new(false)),
        );
        let kind = ValueKind::range("tsrange", ts);
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let value = Value::range(PgRange::closed_open(
            crate::core::DateTimeValue::unspecified(start),
            crate::core::DateTimeValue::MAX,
        ));
        assert_eq!(
            kind.generate_literal(&value).unwrap(),
            r#"'["2020-01-01 00:00:00","infinity")'::tsrange"#
        );
    }

    #[test]
    fn test_multirange_literal() {
        let date = ValueKind::scalar(
            "date",
            ClrShape::Date,
            DialectTag::Date,
            FormatterImpl::Date(DateFormatter),
        );
        let range = ValueKind::range("int4range", integer());
        let kind = ValueKind::multirange("int4multirange", range).unwrap();
        assert_eq!(
            kind.dialect_tag(),
            &DialectTag::multirange_of(DialectTag::Integer)
        );
        let value = Value::Multirange(vec![PgRange::closed_open(1, 3), PgRange::closed_open(5, 7)]);
        assert_eq!(
            kind.generate_literal(&value).unwrap(),
            "'{[1,3),[5,7)}'::int4multirange"
        );
        assert!(ValueKind::multirange("datemultirange", date).is_err());
    }

    #[test]
    fn test_hstore_literal_round_trip() {
        let kind = ValueKind::hstore();
        let value = Value::map([("a\"b", Some("it's")), ("k2", None::<&str>)]);
        let literal = kind.generate_literal(&value).unwrap();
        assert_eq!(literal, r#"HSTORE '"a\"b"=>"it''s","k2"=>NULL'"#);
        assert_eq!(kind.parse_literal(&literal).unwrap(), value);
    }

    #[test]
    fn test_empty_hstore() {
        let kind = ValueKind::hstore();
        let empty = Value::Map(BTreeMap::new());
        assert_eq!(kind.generate_literal(&empty).unwrap(), "HSTORE ''");
        assert_eq!(kind.parse_literal("HSTORE ''").unwrap(), empty);
    }

    #[test]
    fn test_hstore_comparer_ignores_order() {
        let kind = ValueKind::hstore();
        let a = Value::map([("x", Some("1")), ("y", None::<&str>)]);
        let b = Value::map([("y", None::<&str>), ("x", Some("1"))]);
        assert!(kind.equals(&a, &b));
        assert_eq!(kind.hash(&a), kind.hash(&b));
    }
}
