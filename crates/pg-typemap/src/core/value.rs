//! Decoded in-memory values handled by the mapping engine.
//!
//! [`Value`] is the dynamic representation every literal formatter, comparer and
//! parameter configurator works on. Collection variants nest further values, so a
//! single enum covers arrays of intervals, ranges of timestamps and so on.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::ops::Bound;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{MappingError, Result};

use super::shape::ClrShape;

/// How a [`DateTimeValue`] should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateTimeKind {
    /// No time zone information; neither UTC nor local.
    #[default]
    Unspecified,
    /// The value is in UTC.
    Utc,
    /// The value is in the local time zone of the process.
    Local,
}

impl fmt::Display for DateTimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeKind::Unspecified => write!(f, "Unspecified"),
            DateTimeKind::Utc => write!(f, "Utc"),
            DateTimeKind::Local => write!(f, "Local"),
        }
    }
}

/// A date-time together with its kind.
///
/// Equality ignores nothing: two values with the same wall clock but different
/// kinds are different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTimeValue {
    pub value: NaiveDateTime,
    pub kind: DateTimeKind,
}

impl DateTimeValue {
    /// The smallest representable date-time. Maps to `-infinity`.
    pub const MIN: DateTimeValue = DateTimeValue {
        value: NaiveDateTime::MIN,
        kind: DateTimeKind::Unspecified,
    };

    /// The largest representable date-time. Maps to `infinity`.
    pub const MAX: DateTimeValue = DateTimeValue {
        value: NaiveDateTime::MAX,
        kind: DateTimeKind::Unspecified,
    };

    pub fn new(value: NaiveDateTime, kind: DateTimeKind) -> Self {
        Self { value, kind }
    }

    pub fn unspecified(value: NaiveDateTime) -> Self {
        Self::new(value, DateTimeKind::Unspecified)
    }

    pub fn utc(value: NaiveDateTime) -> Self {
        Self::new(value, DateTimeKind::Utc)
    }

    pub fn local(value: NaiveDateTime) -> Self {
        Self::new(value, DateTimeKind::Local)
    }

    /// True for the minimum sentinel, regardless of kind.
    pub fn is_min(&self) -> bool {
        self.value == NaiveDateTime::MIN
    }

    /// True for the maximum sentinel, regardless of kind.
    pub fn is_max(&self) -> bool {
        self.value == NaiveDateTime::MAX
    }
}

impl From<DateTime<Utc>> for DateTimeValue {
    fn from(v: DateTime<Utc>) -> Self {
        DateTimeValue::utc(v.naive_utc())
    }
}

impl From<DateTime<Local>> for DateTimeValue {
    fn from(v: DateTime<Local>) -> Self {
        DateTimeValue::local(v.naive_local())
    }
}

/// An array value with explicit dimensions.
///
/// Elements are stored flat in row-major order; `dimensions` holds the length of
/// each dimension. Single-dimensional arrays have exactly one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    dimensions: Vec<usize>,
    elements: Vec<Value>,
}

impl ArrayValue {
    /// Create a single-dimensional array.
    pub fn new(elements: Vec<Value>) -> Self {
        Self {
            dimensions: vec![elements.len()],
            elements,
        }
    }

    /// Create an array with explicit dimensions.
    ///
    /// The product of the dimensions must equal the number of elements.
    pub fn with_dimensions(dimensions: Vec<usize>, elements: Vec<Value>) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(MappingError::Conversion(
                "an array needs at least one dimension".into(),
            ));
        }
        let expected: usize = dimensions.iter().product();
        if expected != elements.len() {
            return Err(MappingError::Conversion(format!(
                "array dimensions {:?} describe {} elements but {} were given",
                dimensions,
                expected,
                elements.len()
            )));
        }
        Ok(Self {
            dimensions,
            elements,
        })
    }

    /// Number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    #[must_use]
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    #[must_use]
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Value] {
        &mut self.elements
    }

    /// A new array with the same dimensions and every element mapped.
    pub fn map_elements(&self, f: impl FnMut(&Value) -> Value) -> Self {
        Self {
            dimensions: self.dimensions.clone(),
            elements: self.elements.iter().map(f).collect(),
        }
    }

    pub fn into_elements(self) -> Vec<Value> {
        self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A PostgreSQL range value.
#[derive(Debug, Clone, PartialEq)]
pub enum PgRange {
    /// The empty range; contains no points.
    Empty,
    /// A range with a lower and an upper bound, either of which may be unbounded.
    Span {
        lower: Bound<Value>,
        upper: Bound<Value>,
    },
}

impl PgRange {
    /// `[lower, upper)`, the canonical form of discrete ranges.
    pub fn closed_open(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        PgRange::Span {
            lower: Bound::Included(lower.into()),
            upper: Bound::Excluded(upper.into()),
        }
    }

    /// `[lower, upper]`.
    pub fn inclusive(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        PgRange::Span {
            lower: Bound::Included(lower.into()),
            upper: Bound::Included(upper.into()),
        }
    }

    /// `(,)`, the range containing everything.
    pub fn unbounded() -> Self {
        PgRange::Span {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, PgRange::Empty)
    }
}

/// An IP host address or network, as stored by `inet` and `cidr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpNetwork {
    /// Create a network, validating the prefix length against the address family.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self> {
        let max = Self::max_prefix(&addr);
        if prefix_len > max {
            return Err(MappingError::Conversion(format!(
                "prefix length {} exceeds {} for address {}",
                prefix_len, max, addr
            )));
        }
        Ok(Self { addr, prefix_len })
    }

    /// A single host address (full-length prefix).
    pub fn host(addr: IpAddr) -> Self {
        let prefix_len = Self::max_prefix(&addr);
        Self { addr, prefix_len }
    }

    fn max_prefix(addr: &IpAddr) -> u8 {
        match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }

    #[must_use]
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// True when the prefix covers the whole address.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.prefix_len == Self::max_prefix(&self.addr)
    }
}

/// `inet` text form: the prefix is omitted for host addresses.
impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{}/{}", self.addr, self.prefix_len)
        }
    }
}

impl FromStr for IpNetwork {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MappingError::Conversion(format!("invalid IP network '{}'", s));
        match s.split_once('/') {
            Some((addr, prefix)) => {
                let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
                let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
                IpNetwork::new(addr, prefix)
            }
            None => Ok(IpNetwork::host(s.parse().map_err(|_| invalid())?)),
        }
    }
}

/// A 6-byte (EUI-48) or 8-byte (EUI-64) MAC address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(Vec<u8>);

impl MacAddress {
    pub fn new(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            6 | 8 => Ok(Self(bytes.to_vec())),
            n => Err(MappingError::Conversion(format!(
                "a MAC address has 6 or 8 bytes, got {}",
                n
            ))),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// True for 8-byte addresses, which need `macaddr8`.
    #[must_use]
    pub fn is_eui64(&self) -> bool {
        self.0.len() == 8
    }
}

/// Canonical form: uppercase hex digits without separators.
impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(&self.0))
    }
}

impl FromStr for MacAddress {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        let bytes = hex::decode(&digits)
            .map_err(|_| MappingError::Conversion(format!("invalid MAC address '{}'", s)))?;
        MacAddress::new(&bytes)
    }
}

/// A fixed or variable length bit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString(pub Vec<bool>);

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(MappingError::Conversion(format!("invalid bit string '{}'", s))),
            })
            .collect::<Result<Vec<_>>>()
            .map(BitString)
    }
}

/// A point on a plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A finite line segment (`lseg`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.end)
    }
}

/// A rectangular box given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PgBox {
    pub upper_right: Point,
    pub lower_left: Point,
}

impl fmt::Display for PgBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.upper_right, self.lower_left)
    }
}

/// An infinite line `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{},{}}}", self.a, self.b, self.c)
    }
}

/// An open or closed path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub points: Vec<Point>,
    pub open: bool,
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.open { ('[', ']') } else { ('(', ')') };
        write!(f, "{}{}{}", open, join_points(&self.points), close)
    }
}

/// A closed polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon(pub Vec<Point>);

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", join_points(&self.0))
    }
}

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.center, self.radius)
    }
}

fn join_points(points: &[Point]) -> String {
    points
        .iter()
        .map(Point::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decoded value enum for type-safe literal generation and comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL. Valid anywhere, including as a collection element.
    Null,

    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),

    /// Decimal value with arbitrary scale.
    Decimal(Decimal),

    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),

    /// Date without time component.
    Date(NaiveDate),

    /// Time of day without time zone.
    Time(NaiveTime),

    /// Date-time carrying a [`DateTimeKind`].
    Timestamp(DateTimeValue),

    /// Date-time with an explicit UTC offset.
    TimestampOffset(DateTime<FixedOffset>),

    /// A duration (days, hours, minutes, seconds and fractions).
    Interval(TimeDelta),

    Json(serde_json::Value),

    Inet(IpNetwork),
    Cidr(IpNetwork),
    MacAddr(MacAddress),

    Point(Point),
    LineSegment(LineSegment),
    Box(PgBox),
    Line(Line),
    Path(Path),
    Polygon(Polygon),
    Circle(Circle),

    Bits(BitString),

    /// Text search document in its canonical text form.
    TsVector(String),

    /// Text search query in its canonical text form.
    TsQuery(String),

    /// A member of a user enum, by member name (before label translation).
    Enum(String),

    /// Array with explicit dimensions.
    Array(ArrayValue),

    /// Growable list; always single-dimensional.
    List(Vec<Value>),

    Range(Box<PgRange>),
    Multirange(Vec<PgRange>),

    /// Key/value map as stored by `hstore`. Keys are never null.
    Map(BTreeMap<String, Option<String>>),
}

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Create a single-dimensional array value.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(ArrayValue::new(elements))
    }

    /// Create a range value.
    pub fn range(range: PgRange) -> Self {
        Value::Range(Box::new(range))
    }

    /// Create a map value from key/value pairs.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        )
    }

    /// The logical in-memory shape of this value.
    ///
    /// Collections report the shape of their first non-null element; empty or
    /// all-null collections report [`ClrShape::Unknown`] as element shape.
    #[must_use]
    pub fn shape(&self) -> ClrShape {
        match self {
            Value::Null => ClrShape::Unknown,
            Value::Bool(_) => ClrShape::Bool,
            Value::I16(_) => ClrShape::I16,
            Value::I32(_) => ClrShape::I32,
            Value::I64(_) => ClrShape::I64,
            Value::F32(_) => ClrShape::F32,
            Value::F64(_) => ClrShape::F64,
            Value::Decimal(_) => ClrShape::Decimal,
            Value::Text(_) => ClrShape::String,
            Value::Bytes(_) => ClrShape::Bytes,
            Value::Uuid(_) => ClrShape::Uuid,
            Value::Date(_) => ClrShape::Date,
            Value::Time(_) => ClrShape::Time,
            Value::Timestamp(_) => ClrShape::DateTime,
            Value::TimestampOffset(_) => ClrShape::DateTimeOffset,
            Value::Interval(_) => ClrShape::TimeSpan,
            Value::Json(_) => ClrShape::Json,
            Value::Inet(_) => ClrShape::Inet,
            Value::Cidr(_) => ClrShape::Cidr,
            Value::MacAddr(_) => ClrShape::MacAddress,
            Value::Point(_) => ClrShape::Point,
            Value::LineSegment(_) => ClrShape::LineSegment,
            Value::Box(_) => ClrShape::Box,
            Value::Line(_) => ClrShape::Line,
            Value::Path(_) => ClrShape::Path,
            Value::Polygon(_) => ClrShape::Polygon,
            Value::Circle(_) => ClrShape::Circle,
            Value::Bits(_) => ClrShape::BitString,
            Value::TsVector(_) => ClrShape::TsVector,
            Value::TsQuery(_) => ClrShape::TsQuery,
            Value::Enum(_) => ClrShape::Enum(String::new()),
            Value::Array(a) => ClrShape::Array(Box::new(element_shape(a.elements()))),
            Value::List(l) => ClrShape::List(Box::new(element_shape(l))),
            Value::Range(r) => ClrShape::Range(Box::new(range_shape(r))),
            Value::Multirange(rs) => ClrShape::Multirange(Box::new(
                rs.iter()
                    .map(range_shape)
                    .find(|s| *s != ClrShape::Unknown)
                    .unwrap_or(ClrShape::Unknown),
            )),
            Value::Map(_) => ClrShape::hstore(),
        }
    }
}

fn element_shape(elements: &[Value]) -> ClrShape {
    elements
        .iter()
        .find(|v| !v.is_null())
        .map(Value::shape)
        .unwrap_or(ClrShape::Unknown)
}

fn range_shape(range: &PgRange) -> ClrShape {
    match range {
        PgRange::Empty => ClrShape::Unknown,
        PgRange::Span { lower, upper } => [lower, upper]
            .into_iter()
            .find_map(|b| match b {
                Bound::Included(v) | Bound::Excluded(v) => Some(v.shape()),
                Bound::Unbounded => None,
            })
            .unwrap_or(ClrShape::Unknown),
    }
}

// From implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<DateTimeValue> for Value {
    fn from(v: DateTimeValue) -> Self {
        Value::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v.into())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::TimestampOffset(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Interval(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<IpAddr> for Value {
    fn from(v: IpAddr) -> Self {
        Value::Inet(IpNetwork::host(v))
    }
}

impl From<MacAddress> for Value {
    fn from(v: MacAddress) -> Self {
        Value::MacAddr(v)
    }
}

impl From<Point> for Value {
    fn from(v: Point) -> Self {
        Value::Point(v)
    }
}

impl From<BitString> for Value {
    fn from(v: BitString) -> Self {
        Value::Bits(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::I32(42).is_null());
        assert!(Value::from(None::<i32>).is_null());
    }

    #[test]
    fn test_array_dimensions_must_match() {
        let ok = ArrayValue::with_dimensions(vec![2, 2], vec![Value::I32(1); 4]).unwrap();
        assert_eq!(ok.rank(), 2);
        assert!(ArrayValue::with_dimensions(vec![2, 3], vec![Value::I32(1); 4]).is_err());
        assert!(ArrayValue::with_dimensions(vec![], vec![]).is_err());
        assert_eq!(ArrayValue::new(vec![]).rank(), 1);
    }

    #[test]
    fn test_shape_of_collections() {
        let v = Value::array(vec![Value::Null, Value::I32(1)]);
        assert_eq!(v.shape(), ClrShape::Array(Box::new(ClrShape::I32)));

        let v = Value::List(vec![]);
        assert_eq!(v.shape(), ClrShape::List(Box::new(ClrShape::Unknown)));

        let v = Value::range(PgRange::closed_open(1i64, 5i64));
        assert_eq!(v.shape(), ClrShape::Range(Box::new(ClrShape::I64)));
    }

    #[test]
    fn test_ip_network_display_and_parse() {
        let host: IpNetwork = "192.168.1.1".parse().unwrap();
        assert!(host.is_host());
        assert_eq!(host.to_string(), "192.168.1.1");

        let net: IpNetwork = "10.0.0.0/8".parse().unwrap();
        assert_eq!(net.prefix_len(), 8);
        assert_eq!(net.to_string(), "10.0.0.0/8");

        assert!("10.0.0.0/33".parse::<IpNetwork>().is_err());
    }

    #[test]
    fn test_mac_address_canonical_form() {
        let mac: MacAddress = "08:00:2b:01:02:03".parse().unwrap();
        assert_eq!(mac.to_string(), "08002B010203");
        assert!(!mac.is_eui64());
        assert!(MacAddress::new(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_geometric_display() {
        assert_eq!(Point::new(1.5, 2.0).to_string(), "(1.5,2)");
        let circle = Circle {
            center: Point::new(0.0, 0.0),
            radius: 3.0,
        };
        assert_eq!(circle.to_string(), "<(0,0),3>");
        let path = Path {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            open: true,
        };
        assert_eq!(path.to_string(), "[(0,0),(1,1)]");
    }

    #[test]
    fn test_datetime_sentinels_ignore_kind() {
        let min_utc = DateTimeValue::utc(NaiveDateTime::MIN);
        assert!(min_utc.is_min());
        assert!(DateTimeValue::MAX.is_max());
        assert_ne!(min_utc, DateTimeValue::MIN);
    }
}
