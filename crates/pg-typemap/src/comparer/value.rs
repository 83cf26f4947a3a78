//! Comparers over the dynamic [`Value`] type.
//!
//! Every [`ValueKind`](crate::mapping::ValueKind) carries one of these behind a
//! [`SharedComparer`]. Collection comparers wrap the comparer of their element kind
//! and reuse the sequence and map algorithms from the parent module.

use std::ops::Bound;
use std::sync::Arc;

use crate::core::{PgRange, Value};

use super::{
    combine_hash, f64_equals, hash_f64, hash_one, sequence_equals, sequence_hash,
    sequence_snapshot, DefaultComparer, MapComparer, NullableComparer, ValueComparer,
};

/// Comparer shared between value kinds.
pub type SharedComparer = Arc<dyn ValueComparer<Value>>;

/// Structural equality over any [`Value`].
///
/// Floats compare NaN-equal, and nested collections are compared element-wise with
/// the same rules.
pub fn value_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::F32(x), Value::F32(y)) => f64_equals(f64::from(*x), f64::from(*y)),
        (Value::F64(x), Value::F64(y)) => f64_equals(*x, *y),
        (Value::Array(x), Value::Array(y)) => {
            x.dimensions() == y.dimensions()
                && sequence_equals(x.elements(), y.elements(), &ScalarValueComparer)
        }
        (Value::List(x), Value::List(y)) => sequence_equals(x, y, &ScalarValueComparer),
        (Value::Range(x), Value::Range(y)) => range_equals(x, y, &ScalarValueComparer),
        (Value::Multirange(x), Value::Multirange(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|(r, s)| range_equals(r, s, &ScalarValueComparer))
        }
        _ => a == b,
    }
}

/// Hash consistent with [`value_equals`].
pub fn value_hash(value: &Value) -> u64 {
    let tag = hash_one(&std::mem::discriminant(value));
    let content = match value {
        Value::Null => 0,
        Value::Bool(v) => hash_one(v),
        Value::I16(v) => hash_one(v),
        Value::I32(v) => hash_one(v),
        Value::I64(v) => hash_one(v),
        Value::F32(v) => hash_f64(f64::from(*v)),
        Value::F64(v) => hash_f64(*v),
        Value::Decimal(v) => hash_one(&v.normalize()),
        Value::Text(v) | Value::TsVector(v) | Value::TsQuery(v) | Value::Enum(v) => hash_one(v),
        Value::Bytes(v) => hash_one(v),
        Value::Uuid(v) => hash_one(v),
        Value::Date(v) => hash_one(v),
        Value::Time(v) => hash_one(v),
        Value::Timestamp(v) => hash_one(v),
        Value::TimestampOffset(v) => hash_one(v),
        Value::Interval(v) => hash_one(v),
        Value::Json(v) => hash_one(&v.to_string()),
        Value::Inet(v) | Value::Cidr(v) => hash_one(v),
        Value::MacAddr(v) => hash_one(v),
        Value::Point(p) => combine_hash(hash_f64(p.x), hash_f64(p.y)),
        Value::LineSegment(s) => combine_hash(
            combine_hash(hash_f64(s.start.x), hash_f64(s.start.y)),
            combine_hash(hash_f64(s.end.x), hash_f64(s.end.y)),
        ),
        Value::Box(b) => combine_hash(
            combine_hash(hash_f64(b.upper_right.x), hash_f64(b.upper_right.y)),
            combine_hash(hash_f64(b.lower_left.x), hash_f64(b.lower_left.y)),
        ),
        Value::Line(l) => combine_hash(combine_hash(hash_f64(l.a), hash_f64(l.b)), hash_f64(l.c)),
        Value::Path(p) => p.points.iter().fold(hash_one(&p.open), |acc, pt| {
            combine_hash(acc, combine_hash(hash_f64(pt.x), hash_f64(pt.y)))
        }),
        Value::Polygon(p) => p.0.iter().fold(hash_one(&p.0.len()), |acc, pt| {
            combine_hash(acc, combine_hash(hash_f64(pt.x), hash_f64(pt.y)))
        }),
        Value::Circle(c) => combine_hash(
            combine_hash(hash_f64(c.center.x), hash_f64(c.center.y)),
            hash_f64(c.radius),
        ),
        Value::Bits(v) => hash_one(v),
        Value::Array(a) => combine_hash(
            hash_one(a.dimensions()),
            sequence_hash(a.elements(), &ScalarValueComparer),
        ),
        Value::List(l) => sequence_hash(l, &ScalarValueComparer),
        Value::Range(r) => range_hash(r, &ScalarValueComparer),
        Value::Multirange(rs) => rs.iter().fold(hash_one(&rs.len()), |acc, r| {
            combine_hash(acc, range_hash(r, &ScalarValueComparer))
        }),
        Value::Map(m) => hash_one(m),
    };
    combine_hash(tag, content)
}

fn bound_equals<C>(a: &Bound<Value>, b: &Bound<Value>, subtype: &C) -> bool
where
    C: ValueComparer<Value> + ?Sized,
{
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => true,
        (Bound::Included(x), Bound::Included(y)) | (Bound::Excluded(x), Bound::Excluded(y)) => {
            subtype.equals(x, y)
        }
        _ => false,
    }
}

fn bound_hash<C>(bound: &Bound<Value>, subtype: &C) -> u64
where
    C: ValueComparer<Value> + ?Sized,
{
    match bound {
        Bound::Unbounded => 1,
        Bound::Included(v) => combine_hash(2, subtype.hash(v)),
        Bound::Excluded(v) => combine_hash(3, subtype.hash(v)),
    }
}

fn bound_snapshot<C>(bound: &Bound<Value>, subtype: &C) -> Bound<Value>
where
    C: ValueComparer<Value> + ?Sized,
{
    match bound {
        Bound::Unbounded => Bound::Unbounded,
        Bound::Included(v) => Bound::Included(subtype.snapshot(v)),
        Bound::Excluded(v) => Bound::Excluded(subtype.snapshot(v)),
    }
}

fn range_equals<C>(a: &PgRange, b: &PgRange, subtype: &C) -> bool
where
    C: ValueComparer<Value> + ?Sized,
{
    match (a, b) {
        (PgRange::Empty, PgRange::Empty) => true,
        (
            PgRange::Span { lower, upper },
            PgRange::Span {
                lower: other_lower,
                upper: other_upper,
            },
        ) => bound_equals(lower, other_lower, subtype) && bound_equals(upper, other_upper, subtype),
        _ => false,
    }
}

fn range_hash<C>(range: &PgRange, subtype: &C) -> u64
where
    C: ValueComparer<Value> + ?Sized,
{
    match range {
        PgRange::Empty => 0,
        PgRange::Span { lower, upper } => {
            combine_hash(bound_hash(lower, subtype), bound_hash(upper, subtype))
        }
    }
}

/// Default comparer for scalar kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarValueComparer;

impl ValueComparer<Value> for ScalarValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        value_equals(a, b)
    }

    fn hash(&self, value: &Value) -> u64 {
        value_hash(value)
    }

    fn snapshot(&self, value: &Value) -> Value {
        value.clone()
    }
}

/// Comparer for `char(n)` kinds: text compares without trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCharValueComparer;

impl ValueComparer<Value> for FixedCharValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Text(x), Value::Text(y)) => x.trim_end() == y.trim_end(),
            _ => value_equals(a, b),
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match value {
            Value::Text(s) => value_hash(&Value::Text(s.trim_end().to_string())),
            other => value_hash(other),
        }
    }

    fn snapshot(&self, value: &Value) -> Value {
        value.clone()
    }
}

/// Null-aware wrapper: two nulls are equal, one null is unequal, otherwise delegate.
#[derive(Clone)]
pub struct NullableValueComparer {
    inner: SharedComparer,
}

impl NullableValueComparer {
    pub fn new(inner: SharedComparer) -> Self {
        Self { inner }
    }
}

impl ValueComparer<Value> for NullableValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a.is_null(), b.is_null()) {
            (true, true) => true,
            (false, false) => self.inner.equals(a, b),
            _ => false,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        if value.is_null() {
            0
        } else {
            self.inner.hash(value)
        }
    }

    fn snapshot(&self, value: &Value) -> Value {
        if value.is_null() {
            Value::Null
        } else {
            self.inner.snapshot(value)
        }
    }
}

/// Comparer for array and list kinds, built from the element kind's comparer.
///
/// Elements may be null; the element comparer is wrapped in
/// [`NullableValueComparer`].
#[derive(Clone)]
pub struct SequenceValueComparer {
    element: NullableValueComparer,
}

impl SequenceValueComparer {
    pub fn new(element: SharedComparer) -> Self {
        Self {
            element: NullableValueComparer::new(element),
        }
    }
}

impl ValueComparer<Value> for SequenceValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Array(x), Value::Array(y)) => {
                x.dimensions() == y.dimensions()
                    && sequence_equals(x.elements(), y.elements(), &self.element)
            }
            (Value::List(x), Value::List(y)) => sequence_equals(x, y, &self.element),
            _ => false,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match value {
            Value::Null => 0,
            Value::Array(a) => combine_hash(
                hash_one(a.dimensions()),
                sequence_hash(a.elements(), &self.element),
            ),
            Value::List(l) => sequence_hash(l, &self.element),
            other => value_hash(other),
        }
    }

    fn snapshot(&self, value: &Value) -> Value {
        match value {
            Value::Array(a) => Value::Array(a.map_elements(|e| self.element.snapshot(e))),
            Value::List(l) => Value::List(sequence_snapshot(l, &self.element)),
            other => other.clone(),
        }
    }
}

/// Comparer for range kinds, built from the subtype's comparer.
#[derive(Clone)]
pub struct RangeValueComparer {
    subtype: SharedComparer,
}

impl RangeValueComparer {
    pub fn new(subtype: SharedComparer) -> Self {
        Self { subtype }
    }
}

impl ValueComparer<PgRange> for RangeValueComparer {
    fn equals(&self, a: &PgRange, b: &PgRange) -> bool {
        range_equals(a, b, self.subtype.as_ref())
    }

    fn hash(&self, value: &PgRange) -> u64 {
        range_hash(value, self.subtype.as_ref())
    }

    fn snapshot(&self, value: &PgRange) -> PgRange {
        match value {
            PgRange::Empty => PgRange::Empty,
            PgRange::Span { lower, upper } => PgRange::Span {
                lower: bound_snapshot(lower, self.subtype.as_ref()),
                upper: bound_snapshot(upper, self.subtype.as_ref()),
            },
        }
    }
}

impl ValueComparer<Value> for RangeValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Range(x), Value::Range(y)) => ValueComparer::<PgRange>::equals(self, x, y),
            _ => false,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match value {
            Value::Null => 0,
            Value::Range(r) => ValueComparer::<PgRange>::hash(self, r),
            other => value_hash(other),
        }
    }

    fn snapshot(&self, value: &Value) -> Value {
        match value {
            Value::Range(r) => Value::range(ValueComparer::<PgRange>::snapshot(self, r)),
            other => other.clone(),
        }
    }
}

/// Comparer for multirange kinds: an ordered sequence of ranges.
#[derive(Clone)]
pub struct MultirangeValueComparer {
    range: RangeValueComparer,
}

impl MultirangeValueComparer {
    pub fn new(range: RangeValueComparer) -> Self {
        Self { range }
    }
}

impl ValueComparer<Value> for MultirangeValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Multirange(x), Value::Multirange(y)) => sequence_equals(x, y, &self.range),
            _ => false,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match value {
            Value::Null => 0,
            Value::Multirange(rs) => sequence_hash(rs, &self.range),
            other => value_hash(other),
        }
    }

    fn snapshot(&self, value: &Value) -> Value {
        match value {
            Value::Multirange(rs) => Value::Multirange(sequence_snapshot(rs, &self.range)),
            other => other.clone(),
        }
    }
}

/// Comparer for `hstore`: string keys, nullable string values, order-insensitive.
#[derive(Debug, Clone, Default)]
pub struct HstoreValueComparer {
    map: MapComparer<NullableComparer<DefaultComparer<String>>>,
}

impl HstoreValueComparer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueComparer<Value> for HstoreValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Map(x), Value::Map(y)) => self.map.equals(x, y),
            _ => false,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match value {
            Value::Null => 0,
            Value::Map(m) => self.map.hash(m),
            other => value_hash(other),
        }
    }

    fn snapshot(&self, value: &Value) -> Value {
        match value {
            Value::Map(m) => Value::Map(self.map.snapshot(m)),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_sequence() -> SequenceValueComparer {
        SequenceValueComparer::new(Arc::new(ScalarValueComparer))
    }

    #[test]
    fn test_sequence_nullable_elements() {
        let cmp = int_sequence();
        let a = Value::array(vec![Value::Null, Value::I32(1)]);
        let b = Value::array(vec![Value::Null, Value::I32(1)]);
        let c = Value::array(vec![Value::I32(1), Value::Null]);
        assert!(cmp.equals(&a, &b));
        assert!(!cmp.equals(&a, &c));
        assert_eq!(cmp.hash(&a), cmp.hash(&b));
    }

    #[test]
    fn test_array_and_list_are_not_equal() {
        let cmp = int_sequence();
        let array = Value::array(vec![Value::I32(1)]);
        let list = Value::List(vec![Value::I32(1)]);
        assert!(!cmp.equals(&array, &list));
        assert!(cmp.equals(&Value::Null, &Value::Null));
        assert!(!cmp.equals(&Value::Null, &list));
    }

    #[test]
    fn test_sequence_snapshot_is_independent() {
        let cmp = int_sequence();
        let mut source = Value::List(vec![Value::Text("a".into())]);
        let snapshot = cmp.snapshot(&source);
        if let Value::List(items) = &mut source {
            items[0] = Value::Text("b".into());
        }
        assert_eq!(snapshot, Value::List(vec![Value::Text("a".into())]));
        assert!(!cmp.equals(&source, &snapshot));
    }

    #[test]
    fn test_scalar_float_equality() {
        let cmp = ScalarValueComparer;
        assert!(cmp.equals(&Value::F64(f64::NAN), &Value::F64(f64::NAN)));
        assert!(cmp.equals(&Value::F64(0.0), &Value::F64(-0.0)));
        assert_eq!(cmp.hash(&Value::F64(0.0)), cmp.hash(&Value::F64(-0.0)));
        assert!(!cmp.equals(&Value::F64(1.0), &Value::F32(1.0)));
    }

    #[test]
    fn test_fixed_char_value_comparer() {
        let cmp = FixedCharValueComparer;
        let a = Value::Text("ab   ".into());
        let b = Value::Text("ab".into());
        assert!(cmp.equals(&a, &b));
        assert_eq!(cmp.hash(&a), cmp.hash(&b));
    }

    #[test]
    fn test_hstore_order_insensitive() {
        let cmp = HstoreValueComparer::new();
        let a = Value::map([("a", Some("1")), ("b", None)]);
        let b = Value::map([("b", None), ("a", Some("1"))]);
        let c = Value::map([("a", Some("1")), ("b", Some("2"))]);
        assert!(cmp.equals(&a, &b));
        assert_eq!(cmp.hash(&a), cmp.hash(&b));
        assert!(!cmp.equals(&a, &c));
    }

    #[test]
    fn test_range_comparer_bounds() {
        let cmp = RangeValueComparer::new(Arc::new(ScalarValueComparer));
        let a = Value::range(PgRange::closed_open(1, 5));
        let b = Value::range(PgRange::closed_open(1, 5));
        let c = Value::range(PgRange::inclusive(1, 5));
        assert!(ValueComparer::<Value>::equals(&cmp, &a, &b));
        assert!(!ValueComparer::<Value>::equals(&cmp, &a, &c));
        assert!(!ValueComparer::<Value>::equals(
            &cmp,
            &a,
            &Value::range(PgRange::Empty)
        ));
    }

    #[test]
    fn test_multirange_order_sensitive() {
        let cmp = MultirangeValueComparer::new(RangeValueComparer::new(Arc::new(
            ScalarValueComparer,
        )));
        let a = Value::Multirange(vec![PgRange::closed_open(1, 3), PgRange::closed_open(5, 7)]);
        let b = Value::Multirange(vec![PgRange::closed_open(5, 7), PgRange::closed_open(1, 3)]);
        assert!(cmp.equals(&a, &a.clone()));
        assert!(!cmp.equals(&a, &b));
    }

    #[test]
    fn test_nested_float_arrays_compare_nan_equal() {
        let a = Value::array(vec![Value::F64(f64::NAN)]);
        let b = Value::array(vec![Value::F64(f64::NAN)]);
        assert!(value_equals(&a, &b));
        assert_eq!(value_hash(&a), value_hash(&b));
    }
}
