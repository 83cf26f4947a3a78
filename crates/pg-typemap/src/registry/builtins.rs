//! Built-in PostgreSQL kinds.
//!
//! Order matters: the first kind registered for a shape becomes that shape's
//! default store type.

use crate::config::default_multirange_name;
use crate::core::{ClrShape, DialectTag};
use crate::literal::{
    BitFormatter, BoolFormatter, ByteaFormatter, DateFormatter, DecimalFormatter, FloatFormatter,
    FormatterImpl, GeometricFormatter, GeometricKind, InetFormatter, IntegerFormatter,
    IntervalFormatter, JsonFormatter, MacAddrFormatter, RegconfigFormatter, TextFormatter,
    TextSearchFormatter, TextSearchKind, TimeFormatter, TimeTzFormatter, TimestampFormatter,
    TimestampTzFormatter, UuidFormatter,
};
use crate::mapping::{store_type, ValueKind};

const TIMESTAMPTZ: &str = "timestamp with time zone";
const TIMESTAMP: &str = "timestamp without time zone";

fn kind(store_type: &str, shape: ClrShape, tag: DialectTag, formatter: FormatterImpl) -> ValueKind {
    ValueKind::scalar(store_type, shape, tag, formatter)
}

/// Scalar kinds in registration order.
pub(super) fn scalar_kinds(legacy_timestamps: bool) -> Vec<ValueKind> {
    let timestamptz = || {
        kind(
            TIMESTAMPTZ,
            ClrShape::DateTime,
            DialectTag::TimestampTz,
            FormatterImpl::TimestampTz(TimestampTzFormatter::new(legacy_timestamps)),
        )
    };
    let timestamp = || {
        kind(
            TIMESTAMP,
            ClrShape::DateTime,
            DialectTag::Timestamp,
            FormatterImpl::Timestamp(TimestampFormatter::new(legacy_timestamps)),
        )
    };

    let mut kinds = vec![
        kind("boolean", ClrShape::Bool, DialectTag::Boolean, FormatterImpl::Bool(BoolFormatter)),
        kind(
            "smallint",
            ClrShape::I16,
            DialectTag::Smallint,
            FormatterImpl::Integer(IntegerFormatter::smallint()),
        ),
        kind(
            "integer",
            ClrShape::I32,
            DialectTag::Integer,
            FormatterImpl::Integer(IntegerFormatter::integer()),
        ),
        kind(
            "bigint",
            ClrShape::I64,
            DialectTag::Bigint,
            FormatterImpl::Integer(IntegerFormatter::bigint()),
        ),
        kind("real", ClrShape::F32, DialectTag::Real, FormatterImpl::Float(FloatFormatter::real())),
        kind(
            "double precision",
            ClrShape::F64,
            DialectTag::Double,
            FormatterImpl::Float(FloatFormatter::double()),
        ),
        kind(
            "numeric",
            ClrShape::Decimal,
            DialectTag::Numeric,
            FormatterImpl::Decimal(DecimalFormatter::numeric()),
        ),
        kind(
            "money",
            ClrShape::Decimal,
            DialectTag::Money,
            FormatterImpl::Decimal(DecimalFormatter::money()),
        ),
    ];

    // Text family
    for (store_type, tag) in [
        ("text", DialectTag::Text),
        ("character varying", DialectTag::Varchar),
        ("character", DialectTag::Char),
        ("name", DialectTag::Name),
        ("citext", DialectTag::Citext),
        ("xml", DialectTag::Xml),
    ] {
        kinds.push(kind(store_type, ClrShape::String, tag, FormatterImpl::Text(TextFormatter)));
    }

    kinds.push(kind("bytea", ClrShape::Bytes, DialectTag::Bytea, FormatterImpl::Bytea(ByteaFormatter)));
    kinds.push(kind("uuid", ClrShape::Uuid, DialectTag::Uuid, FormatterImpl::Uuid(UuidFormatter)));

    // JSON documents and JSON held as text
    for shape in [ClrShape::Json, ClrShape::String] {
        kinds.push(kind(
            "jsonb",
            shape.clone(),
            DialectTag::Jsonb,
            FormatterImpl::Json(JsonFormatter::jsonb()),
        ));
        kinds.push(kind("json", shape, DialectTag::Json, FormatterImpl::Json(JsonFormatter::json())));
    }

    // Date/time. The default store type for DateTime flips in legacy mode.
    kinds.push(kind("date", ClrShape::Date, DialectTag::Date, FormatterImpl::Date(DateFormatter)));
    kinds.push(kind(
        "time without time zone",
        ClrShape::Time,
        DialectTag::Time,
        FormatterImpl::Time(TimeFormatter),
    ));
    if legacy_timestamps {
        kinds.push(timestamp());
        kinds.push(timestamptz());
    } else {
        kinds.push(timestamptz());
        kinds.push(timestamp());
    }
    kinds.push(kind(
        TIMESTAMPTZ,
        ClrShape::DateTimeOffset,
        DialectTag::TimestampTz,
        FormatterImpl::TimestampTz(TimestampTzFormatter::new(legacy_timestamps)),
    ));
    kinds.push(kind(
        "time with time zone",
        ClrShape::DateTimeOffset,
        DialectTag::TimeTz,
        FormatterImpl::TimeTz(TimeTzFormatter),
    ));
    kinds.push(kind(
        "interval",
        ClrShape::TimeSpan,
        DialectTag::Interval,
        FormatterImpl::Interval(IntervalFormatter),
    ));

    // Network
    kinds.push(kind("inet", ClrShape::Inet, DialectTag::Inet, FormatterImpl::Inet(InetFormatter::inet())));
    kinds.push(kind("cidr", ClrShape::Cidr, DialectTag::Cidr, FormatterImpl::Inet(InetFormatter::cidr())));
    kinds.push(kind(
        "macaddr",
        ClrShape::MacAddress,
        DialectTag::MacAddr,
        FormatterImpl::MacAddr(MacAddrFormatter::macaddr()),
    ));
    kinds.push(kind(
        "macaddr8",
        ClrShape::MacAddress,
        DialectTag::MacAddr8,
        FormatterImpl::MacAddr(MacAddrFormatter::macaddr8()),
    ));

    // Geometry
    for (store_type, shape, tag, geometric) in [
        ("point", ClrShape::Point, DialectTag::Point, GeometricKind::Point),
        ("lseg", ClrShape::LineSegment, DialectTag::LSeg, GeometricKind::LineSegment),
        ("box", ClrShape::Box, DialectTag::Box, GeometricKind::Box),
        ("line", ClrShape::Line, DialectTag::Line, GeometricKind::Line),
        ("path", ClrShape::Path, DialectTag::Path, GeometricKind::Path),
        ("polygon", ClrShape::Polygon, DialectTag::Polygon, GeometricKind::Polygon),
        ("circle", ClrShape::Circle, DialectTag::Circle, GeometricKind::Circle),
    ] {
        kinds.push(kind(
            store_type,
            shape,
            tag,
            FormatterImpl::Geometric(GeometricFormatter::new(geometric)),
        ));
    }

    kinds.push(kind("bit varying", ClrShape::BitString, DialectTag::Varbit, FormatterImpl::Bit(BitFormatter)));
    kinds.push(kind("bit", ClrShape::BitString, DialectTag::Bit, FormatterImpl::Bit(BitFormatter)));

    // Full-text search
    kinds.push(kind(
        "tsvector",
        ClrShape::TsVector,
        DialectTag::TsVector,
        FormatterImpl::TextSearch(TextSearchFormatter::new(TextSearchKind::Vector)),
    ));
    kinds.push(kind(
        "tsquery",
        ClrShape::TsQuery,
        DialectTag::TsQuery,
        FormatterImpl::TextSearch(TextSearchFormatter::new(TextSearchKind::Query)),
    ));
    kinds.push(kind(
        "regconfig",
        ClrShape::String,
        DialectTag::Regconfig,
        FormatterImpl::Regconfig(RegconfigFormatter),
    ));

    kinds.push(ValueKind::hstore());
    kinds
}

/// Built-in ranges as `(range, subtype)` store type pairs, in registration order.
pub(super) fn range_types(legacy_timestamps: bool) -> Vec<(&'static str, &'static str)> {
    let mut ranges = vec![
        ("int4range", "integer"),
        ("int8range", "bigint"),
        ("numrange", "numeric"),
    ];
    if legacy_timestamps {
        ranges.push(("tsrange", TIMESTAMP));
        ranges.push(("tstzrange", TIMESTAMPTZ));
    } else {
        ranges.push(("tstzrange", TIMESTAMPTZ));
        ranges.push(("tsrange", TIMESTAMP));
    }
    ranges.push(("daterange", "date"));
    ranges
}

/// True when `name` is, or is an alias of, a built-in scalar, range or
/// multirange store type.
pub(crate) fn is_builtin_store_type(name: &str) -> bool {
    let base = match store_type::parse(name) {
        Ok(parsed) => parsed.base,
        Err(_) => return false,
    };
    scalar_kinds(false).iter().any(|k| k.base_store_type() == base)
        || range_types(false)
            .iter()
            .any(|(range, _)| *range == base || default_multirange_name(range) == base)
}
