//! Logical in-memory shapes that value kinds decode to.

use std::fmt;

/// The logical in-memory type of a column value.
///
/// A shape is what the caller holds; a [`ValueKind`](crate::mapping::ValueKind)
/// binds a shape to a PostgreSQL store type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClrShape {
    // ===== Primitives =====
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Uuid,

    // ===== Date/Time =====
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date-time with a UTC/Local/Unspecified kind.
    DateTime,
    /// Date-time with an explicit offset.
    DateTimeOffset,
    /// Duration.
    TimeSpan,

    // ===== Special =====
    Json,
    Inet,
    Cidr,
    MacAddress,
    Point,
    LineSegment,
    Box,
    Line,
    Path,
    Polygon,
    Circle,
    BitString,
    TsVector,
    TsQuery,

    /// A user enum, by PostgreSQL enum type name.
    Enum(String),

    /// A caller-defined shape layered on top of a physical kind by a value converter.
    Named(String),

    // ===== Collections =====
    Array(Box<ClrShape>),
    List(Box<ClrShape>),
    Range(Box<ClrShape>),
    Multirange(Box<ClrShape>),
    Map(Box<ClrShape>, Box<ClrShape>),

    /// Shape of NULL, or element shape of an empty collection.
    Unknown,
}

impl ClrShape {
    pub fn array_of(element: ClrShape) -> Self {
        ClrShape::Array(Box::new(element))
    }

    pub fn list_of(element: ClrShape) -> Self {
        ClrShape::List(Box::new(element))
    }

    pub fn range_of(subtype: ClrShape) -> Self {
        ClrShape::Range(Box::new(subtype))
    }

    pub fn multirange_of(subtype: ClrShape) -> Self {
        ClrShape::Multirange(Box::new(subtype))
    }

    /// The shape of an `hstore` value: string keys to nullable string values.
    pub fn hstore() -> Self {
        ClrShape::Map(Box::new(ClrShape::String), Box::new(ClrShape::String))
    }

    /// Element shape for arrays and lists.
    #[must_use]
    pub fn element(&self) -> Option<&ClrShape> {
        match self {
            ClrShape::Array(e) | ClrShape::List(e) => Some(e),
            _ => None,
        }
    }

    /// True for collection-shaped values.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ClrShape::Array(_)
                | ClrShape::List(_)
                | ClrShape::Range(_)
                | ClrShape::Multirange(_)
                | ClrShape::Map(..)
        )
    }

    /// True for integral primitive shapes.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, ClrShape::I16 | ClrShape::I32 | ClrShape::I64)
    }

    /// Whether a value of shape `actual` can be used where `self` is expected.
    ///
    /// `Unknown` on either side matches anything, so empty collections and
    /// unnamed enum values are accepted.
    #[must_use]
    pub fn accepts(&self, actual: &ClrShape) -> bool {
        match (self, actual) {
            (ClrShape::Unknown, _) | (_, ClrShape::Unknown) => true,
            (ClrShape::Enum(_), ClrShape::Enum(a)) if a.is_empty() => true,
            (ClrShape::Array(e), ClrShape::Array(a))
            | (ClrShape::List(e), ClrShape::List(a))
            | (ClrShape::Range(e), ClrShape::Range(a))
            | (ClrShape::Multirange(e), ClrShape::Multirange(a)) => e.accepts(a),
            (ClrShape::Map(k, v), ClrShape::Map(ak, av)) => k.accepts(ak) && v.accepts(av),
            _ => self == actual,
        }
    }
}

impl fmt::Display for ClrShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClrShape::Bool => write!(f, "Bool"),
            ClrShape::I16 => write!(f, "I16"),
            ClrShape::I32 => write!(f, "I32"),
            ClrShape::I64 => write!(f, "I64"),
            ClrShape::F32 => write!(f, "F32"),
            ClrShape::F64 => write!(f, "F64"),
            ClrShape::Decimal => write!(f, "Decimal"),
            ClrShape::String => write!(f, "String"),
            ClrShape::Bytes => write!(f, "Bytes"),
            ClrShape::Uuid => write!(f, "Uuid"),
            ClrShape::Date => write!(f, "Date"),
            ClrShape::Time => write!(f, "Time"),
            ClrShape::DateTime => write!(f, "DateTime"),
            ClrShape::DateTimeOffset => write!(f, "DateTimeOffset"),
            ClrShape::TimeSpan => write!(f, "TimeSpan"),
            ClrShape::Json => write!(f, "Json"),
            ClrShape::Inet => write!(f, "Inet"),
            ClrShape::Cidr => write!(f, "Cidr"),
            ClrShape::MacAddress => write!(f, "MacAddress"),
            ClrShape::Point => write!(f, "Point"),
            ClrShape::LineSegment => write!(f, "LineSegment"),
            ClrShape::Box => write!(f, "Box"),
            ClrShape::Line => write!(f, "Line"),
            ClrShape::Path => write!(f, "Path"),
            ClrShape::Polygon => write!(f, "Polygon"),
            ClrShape::Circle => write!(f, "Circle"),
            ClrShape::BitString => write!(f, "BitString"),
            ClrShape::TsVector => write!(f, "TsVector"),
            ClrShape::TsQuery => write!(f, "TsQuery"),
            ClrShape::Enum(name) => write!(f, "Enum({})", name),
            ClrShape::Named(name) => write!(f, "{}", name),
            ClrShape::Array(inner) => write!(f, "Array({})", inner),
            ClrShape::List(inner) => write!(f, "List({})", inner),
            ClrShape::Range(inner) => write!(f, "Range({})", inner),
            ClrShape::Multirange(inner) => write!(f, "Multirange({})", inner),
            ClrShape::Map(k, v) => write!(f, "Map({},{})", k, v),
            ClrShape::Unknown => write!(f, "Unknown"),
        }
    }
}
