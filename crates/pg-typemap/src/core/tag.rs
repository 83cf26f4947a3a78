//! Wire-level type tags placed on configured parameters.

use std::fmt;

/// Identifies the PostgreSQL wire type a driver should use for a parameter.
///
/// Collection tags wrap the tag of their element, so `integer[]` is
/// `Array(Integer)` and `tstzrange` is `Range(TimestampTz)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DialectTag {
    Boolean,
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    Numeric,
    Money,

    Text,
    Varchar,
    Char,
    Name,
    Citext,

    Bytea,
    Uuid,

    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval,

    Json,
    Jsonb,
    Xml,

    Inet,
    Cidr,
    MacAddr,
    MacAddr8,

    Point,
    LSeg,
    Box,
    Line,
    Path,
    Polygon,
    Circle,

    Bit,
    Varbit,

    TsVector,
    TsQuery,
    Regconfig,

    Hstore,

    /// No built-in tag; the driver resolves the type by data type name (enums).
    Unknown,

    Array(Box<DialectTag>),
    Range(Box<DialectTag>),
    Multirange(Box<DialectTag>),
}

impl DialectTag {
    pub fn array_of(element: DialectTag) -> Self {
        DialectTag::Array(Box::new(element))
    }

    pub fn range_of(subtype: DialectTag) -> Self {
        DialectTag::Range(Box::new(subtype))
    }

    pub fn multirange_of(subtype: DialectTag) -> Self {
        DialectTag::Multirange(Box::new(subtype))
    }
}

impl fmt::Display for DialectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialectTag::Boolean => "Boolean",
            DialectTag::Smallint => "Smallint",
            DialectTag::Integer => "Integer",
            DialectTag::Bigint => "Bigint",
            DialectTag::Real => "Real",
            DialectTag::Double => "Double",
            DialectTag::Numeric => "Numeric",
            DialectTag::Money => "Money",
            DialectTag::Text => "Text",
            DialectTag::Varchar => "Varchar",
            DialectTag::Char => "Char",
            DialectTag::Name => "Name",
            DialectTag::Citext => "Citext",
            DialectTag::Bytea => "Bytea",
            DialectTag::Uuid => "Uuid",
            DialectTag::Date => "Date",
            DialectTag::Time => "Time",
            DialectTag::TimeTz => "TimeTz",
            DialectTag::Timestamp => "Timestamp",
            DialectTag::TimestampTz => "TimestampTz",
            DialectTag::Interval => "Interval",
            DialectTag::Json => "Json",
            DialectTag::Jsonb => "Jsonb",
            DialectTag::Xml => "Xml",
            DialectTag::Inet => "Inet",
            DialectTag::Cidr => "Cidr",
            DialectTag::MacAddr => "MacAddr",
            DialectTag::MacAddr8 => "MacAddr8",
            DialectTag::Point => "Point",
            DialectTag::LSeg => "LSeg",
            DialectTag::Box => "Box",
            DialectTag::Line => "Line",
            DialectTag::Path => "Path",
            DialectTag::Polygon => "Polygon",
            DialectTag::Circle => "Circle",
            DialectTag::Bit => "Bit",
            DialectTag::Varbit => "Varbit",
            DialectTag::TsVector => "TsVector",
            DialectTag::TsQuery => "TsQuery",
            DialectTag::Regconfig => "Regconfig",
            DialectTag::Hstore => "Hstore",
            DialectTag::Unknown => "Unknown",
            DialectTag::Array(inner) => return write!(f, "Array | {}", inner),
            DialectTag::Range(inner) => return write!(f, "Range | {}", inner),
            DialectTag::Multirange(inner) => return write!(f, "Multirange | {}", inner),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(DialectTag::Integer.to_string(), "Integer");
        assert_eq!(
            DialectTag::array_of(DialectTag::Interval).to_string(),
            "Array | Interval"
        );
        assert_eq!(
            DialectTag::multirange_of(DialectTag::Date).to_string(),
            "Multirange | Date"
        );
    }
}
