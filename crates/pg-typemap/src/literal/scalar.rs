//! Formatters for boolean, numeric, text, binary, uuid and json families.

use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::Value;
use crate::error::{MappingError, Result};

use super::{
    quote, quote_embedded, strip_cast, strip_keyword, unquote, unquote_cast, wrong_shape,
    LiteralFormatter,
};

/// `TRUE` / `FALSE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolFormatter;

impl LiteralFormatter for BoolFormatter {
    fn family(&self) -> &str {
        "boolean"
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Bool(true) => Ok("TRUE".into()),
            Value::Bool(false) => Ok("FALSE".into()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let literal = literal.trim();
        if literal.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if literal.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(MappingError::invalid_literal(self.family(), literal))
        }
    }
}

/// Storage width of an integer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerWidth {
    I16,
    I32,
    I64,
}

/// Plain decimal integers.
///
/// Any integer value is accepted; parsing produces the family's own width.
#[derive(Debug, Clone, Copy)]
pub struct IntegerFormatter {
    width: IntegerWidth,
}

impl IntegerFormatter {
    pub fn smallint() -> Self {
        Self {
            width: IntegerWidth::I16,
        }
    }

    pub fn integer() -> Self {
        Self {
            width: IntegerWidth::I32,
        }
    }

    pub fn bigint() -> Self {
        Self {
            width: IntegerWidth::I64,
        }
    }

    pub fn width(&self) -> IntegerWidth {
        self.width
    }
}

impl LiteralFormatter for IntegerFormatter {
    fn family(&self) -> &str {
        match self.width {
            IntegerWidth::I16 => "smallint",
            IntegerWidth::I32 => "integer",
            IntegerWidth::I64 => "bigint",
        }
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::I16(v) => Ok(v.to_string()),
            Value::I32(v) => Ok(v.to_string()),
            Value::I64(v) => Ok(v.to_string()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let invalid = || MappingError::invalid_literal(self.family(), literal);
        let text = literal.trim();
        match self.width {
            IntegerWidth::I16 => text.parse::<i16>().map(Value::I16).map_err(|_| invalid()),
            IntegerWidth::I32 => text.parse::<i32>().map(Value::I32).map_err(|_| invalid()),
            IntegerWidth::I64 => text.parse::<i64>().map(Value::I64).map_err(|_| invalid()),
        }
    }
}

/// `real` and `double precision`.
///
/// Non-finite values render as quoted tokens; finite values use the shortest
/// representation that round-trips. `real` literals carry a `::real` cast.
#[derive(Debug, Clone, Copy)]
pub struct FloatFormatter {
    single: bool,
}

impl FloatFormatter {
    pub fn real() -> Self {
        Self { single: true }
    }

    pub fn double() -> Self {
        Self { single: false }
    }

    /// Literal text without quotes or cast, and whether the value is finite.
    fn bare(value: &Value) -> Option<(String, bool)> {
        let v = match value {
            Value::F32(v) if v.is_finite() => return Some((format!("{:?}", v), true)),
            Value::F64(v) if v.is_finite() => return Some((format!("{:?}", v), true)),
            Value::F32(v) => f64::from(*v),
            Value::F64(v) => *v,
            _ => return None,
        };
        Some((non_finite_token(v).to_string(), false))
    }
}

fn non_finite_token(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

impl LiteralFormatter for FloatFormatter {
    fn family(&self) -> &str {
        if self.single {
            "real"
        } else {
            "double precision"
        }
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        let (bare, finite) =
            Self::bare(value).ok_or_else(|| wrong_shape(self.family(), value))?;
        let text = if finite { bare } else { format!("'{}'", bare) };
        if self.single {
            Ok(format!("{}::real", text))
        } else {
            Ok(text)
        }
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        Self::bare(value)
            .map(|(text, _)| text)
            .ok_or_else(|| wrong_shape(self.family(), value))
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let invalid = || MappingError::invalid_literal(self.family(), literal);
        let body = if self.single {
            strip_cast(literal, "real")
        } else {
            literal.trim()
        };
        let token = unquote(body).unwrap_or_else(|| body.to_string());
        let parsed = match token.as_str() {
            "NaN" => f64::NAN,
            "Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            other => {
                if self.single {
                    return other.parse::<f32>().map(Value::F32).map_err(|_| invalid());
                }
                other.parse::<f64>().map_err(|_| invalid())?
            }
        };
        if self.single {
            Ok(Value::F32(parsed as f32))
        } else {
            Ok(Value::F64(parsed))
        }
    }
}

/// `numeric` and `money`.
///
/// The decimal renders with its full scale, so `1.50` stays `1.50`.
#[derive(Debug, Clone, Copy)]
pub struct DecimalFormatter {
    money: bool,
}

impl DecimalFormatter {
    pub fn numeric() -> Self {
        Self { money: false }
    }

    pub fn money() -> Self {
        Self { money: true }
    }
}

impl LiteralFormatter for DecimalFormatter {
    fn family(&self) -> &str {
        if self.money {
            "money"
        } else {
            "numeric"
        }
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        let text = self.format_embedded(value, store_type)?;
        if self.money {
            Ok(format!("{}::money", text))
        } else {
            Ok(text)
        }
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Decimal(d) => Ok(d.to_string()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let body = if self.money {
            strip_cast(literal, "money")
        } else {
            literal.trim()
        };
        Decimal::from_str(body)
            .map(Value::Decimal)
            .map_err(|_| MappingError::invalid_literal(self.family(), literal))
    }
}

/// Single-quoted strings for `text`, `varchar(n)`, `char(n)`, `name` and `citext`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl LiteralFormatter for TextFormatter {
    fn family(&self) -> &str {
        "text"
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Text(s) => Ok(quote(s)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Text(s) => Ok(quote_embedded(s)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        unquote(literal.trim())
            .map(Value::Text)
            .ok_or_else(|| MappingError::invalid_literal(self.family(), literal))
    }
}

/// `BYTEA E'\\x0AFF'`, uppercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteaFormatter;

impl LiteralFormatter for ByteaFormatter {
    fn family(&self) -> &str {
        "bytea"
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Bytes(b) => Ok(format!("BYTEA E'\\\\x{}'", hex::encode_upper(b))),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Bytes(b) => Ok(format!("\"\\\\x{}\"", hex::encode_upper(b))),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let invalid = || MappingError::invalid_literal(self.family(), literal);
        let digits = strip_keyword(literal, "BYTEA")
            .and_then(|rest| rest.strip_prefix("E'\\\\x"))
            .and_then(|rest| rest.strip_suffix('\''))
            .ok_or_else(invalid)?;
        hex::decode(digits).map(Value::Bytes).map_err(|_| invalid())
    }
}

/// `'...'::uuid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidFormatter;

impl LiteralFormatter for UuidFormatter {
    fn family(&self) -> &str {
        "uuid"
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Uuid(u) => Ok(format!("'{}'::uuid", u)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Uuid(u) => Ok(u.to_string()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_cast(literal, "uuid", self.family())?;
        Uuid::parse_str(&text)
            .map(Value::Uuid)
            .map_err(|_| MappingError::invalid_literal(self.family(), literal))
    }
}

/// `'...'::json` or `'...'::jsonb`.
///
/// Accepts parsed JSON documents and raw JSON text.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    binary: bool,
}

impl JsonFormatter {
    pub fn json() -> Self {
        Self { binary: false }
    }

    pub fn jsonb() -> Self {
        Self { binary: true }
    }

    fn cast(&self) -> &'static str {
        if self.binary {
            "jsonb"
        } else {
            "json"
        }
    }

    fn text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Json(doc) => Ok(doc.to_string()),
            Value::Text(s) => Ok(s.clone()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }
}

impl LiteralFormatter for JsonFormatter {
    fn family(&self) -> &str {
        self.cast()
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(format!("{}::{}", quote(&self.text(value)?), self.cast()))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(quote_embedded(&self.text(value)?))
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_cast(literal, self.cast(), self.family())?;
        Ok(Value::Json(serde_json::from_str(&text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_literals() {
        let f = BoolFormatter;
        assert_eq!(f.format(&Value::Bool(true), "boolean").unwrap(), "TRUE");
        assert_eq!(f.format(&Value::Bool(false), "boolean").unwrap(), "FALSE");
        assert_eq!(f.parse("TRUE", "boolean").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_bytea_uppercase_hex() {
        let f = ByteaFormatter;
        let literal = f.format(&Value::Bytes(vec![0x0A, 0xFF]), "bytea").unwrap();
        assert_eq!(literal, r"BYTEA E'\\x0AFF'");
        assert_eq!(
            f.parse(&literal, "bytea").unwrap(),
            Value::Bytes(vec![0x0A, 0xFF])
        );
        assert_eq!(f.format(&Value::Bytes(vec![]), "bytea").unwrap(), r"BYTEA E'\\x'");
    }

    #[test]
    fn test_bytea_rejects_text() {
        let err = ByteaFormatter
            .format(&Value::Text("x".into()), "bytea")
            .unwrap_err();
        assert!(matches!(err, MappingError::UnsupportedLiteralShape { .. }));
    }

    #[test]
    fn test_double_special_values() {
        let f = FloatFormatter::double();
        assert_eq!(f.format(&Value::F64(f64::NAN), "double precision").unwrap(), "'NaN'");
        assert_eq!(
            f.format(&Value::F64(f64::INFINITY), "double precision").unwrap(),
            "'Infinity'"
        );
        assert_eq!(
            f.format(&Value::F64(f64::NEG_INFINITY), "double precision").unwrap(),
            "'-Infinity'"
        );
        assert_eq!(f.format(&Value::F64(1.0), "double precision").unwrap(), "1.0");
        assert_eq!(f.format(&Value::F64(0.1), "double precision").unwrap(), "0.1");
    }

    #[test]
    fn test_real_carries_cast() {
        let f = FloatFormatter::real();
        assert_eq!(f.format(&Value::F32(f32::NAN), "real").unwrap(), "'NaN'::real");
        assert_eq!(f.format(&Value::F32(1.5), "real").unwrap(), "1.5::real");
        assert_eq!(f.parse("1.5::real", "real").unwrap(), Value::F32(1.5));
        match f.parse("'NaN'::real", "real").unwrap() {
            Value::F32(v) => assert!(v.is_nan()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_float_round_trip_extremes() {
        let f = FloatFormatter::double();
        for v in [f64::MAX, f64::MIN_POSITIVE, -0.5, 1e300, 123456.789] {
            let literal = f.format(&Value::F64(v), "double precision").unwrap();
            assert_eq!(f.parse(&literal, "double precision").unwrap(), Value::F64(v));
        }
    }

    #[test]
    fn test_decimal_keeps_scale() {
        let f = DecimalFormatter::numeric();
        let d = Decimal::from_str("1.50").unwrap();
        assert_eq!(f.format(&Value::Decimal(d), "numeric").unwrap(), "1.50");

        let money = DecimalFormatter::money();
        assert_eq!(
            money.format(&Value::Decimal(d), "money").unwrap(),
            "1.50::money"
        );
        assert_eq!(
            money.parse("1.50::money", "money").unwrap(),
            Value::Decimal(d)
        );
    }

    #[test]
    fn test_text_quotes_doubled() {
        let f = TextFormatter;
        assert_eq!(f.format(&Value::Text("O'Brien".into()), "text").unwrap(), "'O''Brien'");
        assert_eq!(f.format(&Value::Text(String::new()), "text").unwrap(), "''");
        assert_eq!(
            f.format_embedded(&Value::Text("say \"hi\"".into()), "text").unwrap(),
            r#""say \"hi\"""#
        );
    }

    #[test]
    fn test_json_casts() {
        let doc = serde_json::json!({"a": 1});
        assert_eq!(
            JsonFormatter::jsonb().format(&Value::Json(doc.clone()), "jsonb").unwrap(),
            r#"'{"a":1}'::jsonb"#
        );
        assert_eq!(
            JsonFormatter::json()
                .parse(r#"'{"a":1}'::json"#, "json")
                .unwrap(),
            Value::Json(doc)
        );
    }

    #[test]
    fn test_uuid_literal() {
        let u = Uuid::nil();
        let literal = UuidFormatter.format(&Value::Uuid(u), "uuid").unwrap();
        assert_eq!(literal, "'00000000-0000-0000-0000-000000000000'::uuid");
        assert_eq!(UuidFormatter.parse(&literal, "uuid").unwrap(), Value::Uuid(u));
    }

    #[test]
    fn test_integer_parse_respects_width() {
        let f = IntegerFormatter::smallint();
        assert_eq!(f.parse("42", "smallint").unwrap(), Value::I16(42));
        assert!(f.parse("70000", "smallint").is_err());
        assert_eq!(
            IntegerFormatter::bigint().format(&Value::I32(-7), "bigint").unwrap(),
            "-7"
        );
    }
}
