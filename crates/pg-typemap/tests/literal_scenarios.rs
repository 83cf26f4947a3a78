//! Literal generation and parsing through the public registry API.
//!
//! These tests resolve kinds the way a provider would and check the SQL text
//! produced for ordinary values, special values and collections.

use chrono::{NaiveDate, TimeDelta};
use pg_typemap::core::{ArrayValue, DateTimeValue};
use pg_typemap::{ClrShape, Config, MappingError, Value, ValueKindRegistry};

fn registry() -> ValueKindRegistry {
    ValueKindRegistry::with_builtins(&Config::default()).unwrap()
}

fn datetime(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// =============================================================================
// Literal Generation
// =============================================================================

#[test]
fn test_scalar_literals() {
    let r = registry();
    let cases = [
        (ClrShape::Bool, Value::Bool(true), "TRUE"),
        (ClrShape::Bytes, Value::Bytes(vec![0x0A, 0xFF]), r"BYTEA E'\\x0AFF'"),
        (
            ClrShape::TimeSpan,
            Value::Interval(TimeDelta::days(1) + TimeDelta::hours(2)),
            "INTERVAL '1 02:00:00'",
        ),
        (ClrShape::String, Value::Text("O'Brien".into()), "'O''Brien'"),
        (ClrShape::I32, Value::Null, "NULL"),
    ];
    for (shape, value, expected) in cases {
        let kind = r.resolve(&shape, None).unwrap();
        assert_eq!(kind.generate_literal(&value).unwrap(), expected, "{}", shape);
    }
}

#[test]
fn test_empty_integer_array() {
    let kind = registry()
        .resolve(&ClrShape::array_of(ClrShape::I32), None)
        .unwrap();
    assert_eq!(
        kind.generate_literal(&Value::array(vec![])).unwrap(),
        "ARRAY[]::integer[]"
    );
}

#[test]
fn test_two_dimensional_array_is_rejected() {
    let kind = registry()
        .resolve(&ClrShape::array_of(ClrShape::I32), None)
        .unwrap();
    let value = Value::Array(
        ArrayValue::with_dimensions(vec![2, 2], vec![Value::I32(0); 4]).unwrap(),
    );
    assert!(matches!(
        kind.generate_literal(&value),
        Err(MappingError::UnsupportedRank { rank: 2 })
    ));
}

#[test]
fn test_local_datetime_for_timestamptz_is_ambiguous() {
    let kind = registry().resolve(&ClrShape::DateTime, None).unwrap();
    assert_eq!(kind.store_type(), "timestamp with time zone");
    let value = Value::Timestamp(DateTimeValue::local(datetime(2021, 6, 1)));
    assert!(matches!(
        kind.generate_literal(&value),
        Err(MappingError::AmbiguousTemporalKind { .. })
    ));
}

#[test]
fn test_legacy_mode_maps_datetime_to_timestamp() {
    let config = Config {
        legacy_timestamp_behavior: true,
        ..Config::default()
    };
    let r = ValueKindRegistry::with_builtins(&config).unwrap();
    let kind = r.resolve(&ClrShape::DateTime, None).unwrap();
    assert_eq!(kind.store_type(), "timestamp without time zone");
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_float_special_values_round_trip() {
    let kind = registry().resolve(&ClrShape::F64, None).unwrap();
    for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.1, -2.5e-10] {
        let literal = kind.generate_literal(&Value::F64(v)).unwrap();
        let parsed = kind.parse_literal(&literal).unwrap();
        assert!(kind.equals(&parsed, &Value::F64(v)), "{} -> {:?}", literal, parsed);
    }
}

#[test]
fn test_date_extremes_round_trip() {
    let kind = registry().resolve(&ClrShape::Date, None).unwrap();
    for d in [NaiveDate::MIN, NaiveDate::MAX] {
        let literal = kind.generate_literal(&Value::Date(d)).unwrap();
        assert!(literal.contains("infinity"), "{}", literal);
        assert_eq!(kind.parse_literal(&literal).unwrap(), Value::Date(d));
    }
}

#[test]
fn test_timestamp_extremes_round_trip() {
    let kind = registry()
        .resolve_by_store_type("timestamp without time zone")
        .unwrap();
    for value in [DateTimeValue::MIN, DateTimeValue::MAX] {
        let literal = kind.generate_literal(&Value::Timestamp(value)).unwrap();
        assert_eq!(
            kind.parse_literal(&literal).unwrap(),
            Value::Timestamp(value)
        );
    }
}

#[test]
fn test_empty_string_round_trip() {
    let kind = registry().resolve(&ClrShape::String, None).unwrap();
    let literal = kind.generate_literal(&Value::Text(String::new())).unwrap();
    assert_eq!(literal, "''");
    assert_eq!(kind.parse_literal(&literal).unwrap(), Value::Text(String::new()));
}

#[test]
fn test_text_array_round_trip() {
    let kind = registry()
        .resolve(&ClrShape::array_of(ClrShape::String), None)
        .unwrap();
    let value = Value::array(vec![
        Value::Text("a,b".into()),
        Value::Null,
        Value::Text(String::new()),
    ]);
    let literal = kind.generate_literal(&value).unwrap();
    assert_eq!(literal, "ARRAY['a,b',NULL,'']::text[]");
    assert_eq!(kind.parse_literal(&literal).unwrap(), value);
}

#[test]
fn test_empty_list_round_trip() {
    let kind = registry()
        .resolve(&ClrShape::list_of(ClrShape::I32), None)
        .unwrap();
    let literal = kind.generate_literal(&Value::List(vec![])).unwrap();
    assert_eq!(kind.parse_literal(&literal).unwrap(), Value::List(vec![]));
}

#[test]
fn test_empty_map_round_trip() {
    let kind = registry().resolve(&ClrShape::hstore(), None).unwrap();
    let empty = Value::map(Vec::<(String, Option<String>)>::new());
    let literal = kind.generate_literal(&empty).unwrap();
    assert_eq!(literal, "HSTORE ''");
    assert_eq!(kind.parse_literal(&literal).unwrap(), empty);
}

#[test]
fn test_range_literal_cannot_be_parsed() {
    let kind = registry().resolve_by_store_type("int4range").unwrap();
    assert!(matches!(
        kind.parse_literal("'[1,5)'::int4range"),
        Err(MappingError::InvalidLiteral { .. })
    ));
}
