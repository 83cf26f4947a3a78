//! SQL literal generation per value kind family.
//!
//! Each family turns one non-null [`Value`] into PostgreSQL literal text. NULL is
//! rendered uniformly by [`ValueKind`](crate::mapping::ValueKind) before dispatch,
//! so formatters never see [`Value::Null`] at the top level.
//!
//! Built-in formatters are dispatched through [`FormatterImpl`] with a plain
//! `match`; extension families plug in as [`FormatterImpl::Custom`].
//!
//! # Embedded form
//!
//! Range and multirange literals nest their bounds inside an outer quoted string,
//! so every family also provides [`LiteralFormatter::format_embedded`]: no keyword
//! prefix, no cast, strings double-quoted with backslash escapes.

mod geometric;
mod network;
mod scalar;
mod special;
mod temporal;

pub use geometric::{GeometricFormatter, GeometricKind};
pub use network::{InetFormatter, MacAddrFormatter};
pub use scalar::{
    BoolFormatter, ByteaFormatter, DecimalFormatter, FloatFormatter, IntegerFormatter,
    IntegerWidth, JsonFormatter, TextFormatter, UuidFormatter,
};
pub use special::{
    BitFormatter, EnumFormatter, NameTranslation, RegconfigFormatter, TextSearchFormatter,
    TextSearchKind,
};
pub use temporal::{
    DateFormatter, IntervalFormatter, TimeFormatter, TimeTzFormatter, TimestampFormatter,
    TimestampTzFormatter,
};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::Value;
use crate::error::{MappingError, Result};

/// Renders values of one family as SQL literals.
pub trait LiteralFormatter: Send + Sync + fmt::Debug {
    /// Family name used in error messages (e.g. `"bytea"`).
    fn family(&self) -> &str;

    /// Standalone literal, e.g. `DATE '2020-01-31'`.
    fn format(&self, value: &Value, store_type: &str) -> Result<String>;

    /// Literal fragment for nesting inside a range or multirange literal.
    fn format_embedded(&self, value: &Value, store_type: &str) -> Result<String> {
        self.format(value, store_type)
    }

    /// Parse a standalone literal produced by [`format`](Self::format).
    fn parse(&self, literal: &str, store_type: &str) -> Result<Value> {
        let _ = store_type;
        Err(MappingError::invalid_literal(self.family(), literal))
    }
}

/// Enum-based static dispatch over the built-in formatters.
#[derive(Debug, Clone)]
pub enum FormatterImpl {
    Bool(BoolFormatter),
    Integer(IntegerFormatter),
    Float(FloatFormatter),
    Decimal(DecimalFormatter),
    Text(TextFormatter),
    Bytea(ByteaFormatter),
    Uuid(UuidFormatter),
    Json(JsonFormatter),
    Date(DateFormatter),
    Time(TimeFormatter),
    TimeTz(TimeTzFormatter),
    Timestamp(TimestampFormatter),
    TimestampTz(TimestampTzFormatter),
    Interval(IntervalFormatter),
    Inet(InetFormatter),
    MacAddr(MacAddrFormatter),
    Geometric(GeometricFormatter),
    Bit(BitFormatter),
    TextSearch(TextSearchFormatter),
    Regconfig(RegconfigFormatter),
    Custom(Arc<dyn LiteralFormatter>),
}

impl FormatterImpl {
    fn inner(&self) -> &dyn LiteralFormatter {
        match self {
            FormatterImpl::Bool(f) => f,
            FormatterImpl::Integer(f) => f,
            FormatterImpl::Float(f) => f,
            FormatterImpl::Decimal(f) => f,
            FormatterImpl::Text(f) => f,
            FormatterImpl::Bytea(f) => f,
            FormatterImpl::Uuid(f) => f,
            FormatterImpl::Json(f) => f,
            FormatterImpl::Date(f) => f,
            FormatterImpl::Time(f) => f,
            FormatterImpl::TimeTz(f) => f,
            FormatterImpl::Timestamp(f) => f,
            FormatterImpl::TimestampTz(f) => f,
            FormatterImpl::Interval(f) => f,
            FormatterImpl::Inet(f) => f,
            FormatterImpl::MacAddr(f) => f,
            FormatterImpl::Geometric(f) => f,
            FormatterImpl::Bit(f) => f,
            FormatterImpl::TextSearch(f) => f,
            FormatterImpl::Regconfig(f) => f,
            FormatterImpl::Custom(f) => f.as_ref(),
        }
    }
}

impl LiteralFormatter for FormatterImpl {
    fn family(&self) -> &str {
        self.inner().family()
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        self.inner().format(value, store_type)
    }

    fn format_embedded(&self, value: &Value, store_type: &str) -> Result<String> {
        self.inner().format_embedded(value, store_type)
    }

    fn parse(&self, literal: &str, store_type: &str) -> Result<Value> {
        self.inner().parse(literal, store_type)
    }
}

/// Store-type family name to formatter.
///
/// Lookup tries the exact name first, then the name with any parenthesized facet
/// removed, so `numeric(10,2)` finds `numeric` and `timestamp(3) with time zone`
/// finds `timestamp with time zone`.
#[derive(Default, Clone)]
pub struct FormatterTable {
    formatters: HashMap<String, FormatterImpl>,
}

impl FormatterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, store_type: impl Into<String>, formatter: FormatterImpl) {
        self.formatters.insert(store_type.into(), formatter);
    }

    #[must_use]
    pub fn get(&self, store_type: &str) -> Option<&FormatterImpl> {
        let key = store_type.trim().to_lowercase();
        if let Some(f) = self.formatters.get(&key) {
            return Some(f);
        }
        let stripped = strip_facets(&key)?;
        self.formatters.get(&stripped)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl fmt::Debug for FormatterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.formatters.keys().collect();
        keys.sort();
        f.debug_struct("FormatterTable")
            .field("store_types", &keys)
            .finish()
    }
}

/// Remove the first `(...)` group and collapse whitespace; `None` if there is none.
fn strip_facets(name: &str) -> Option<String> {
    let open = name.find('(')?;
    let close = open + name[open..].find(')')?;
    let joined = format!("{} {}", &name[..open], &name[close + 1..]);
    Some(joined.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Single-quote a string, doubling embedded quotes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Double-quote a string for nesting inside a single-quoted literal.
///
/// `\` and `"` are backslash-escaped and `'` is doubled.
pub fn quote_embedded(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("''"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`quote`]; `None` if the text is not a single-quoted string.
pub fn unquote(s: &str) -> Option<String> {
    let inner = s.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // Quotes inside must come in pairs.
            if chars.next() != Some('\'') {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

/// Strip a case-insensitive keyword prefix such as `DATE ` and return the rest.
pub(crate) fn strip_keyword<'a>(literal: &'a str, keyword: &str) -> Option<&'a str> {
    let literal = literal.trim();
    let head = literal.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &literal[keyword.len()..];
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Strip a trailing `::cast` if present.
pub(crate) fn strip_cast<'a>(literal: &'a str, cast: &str) -> &'a str {
    let literal = literal.trim();
    match literal.rfind("::") {
        Some(pos) if literal[pos + 2..].eq_ignore_ascii_case(cast) => &literal[..pos],
        _ => literal,
    }
}

/// Unquote a `KEYWORD '...'` literal.
pub(crate) fn unquote_keyword(literal: &str, keyword: &str, family: &str) -> Result<String> {
    strip_keyword(literal, keyword)
        .and_then(unquote)
        .ok_or_else(|| MappingError::invalid_literal(family, literal))
}

/// Unquote a `'...'::cast` literal.
pub(crate) fn unquote_cast(literal: &str, cast: &str, family: &str) -> Result<String> {
    unquote(strip_cast(literal, cast)).ok_or_else(|| MappingError::invalid_literal(family, literal))
}

/// Error for a value whose shape does not belong to `family`.
pub(crate) fn wrong_shape(family: &str, value: &Value) -> MappingError {
    MappingError::unsupported_shape(family, value.shape())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_and_unquote() {
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(unquote("'it''s'").as_deref(), Some("it's"));
        assert_eq!(unquote("''").as_deref(), Some(""));
        assert!(unquote("'it's'").is_none());
        assert!(unquote("plain").is_none());
    }

    #[test]
    fn test_quote_embedded() {
        assert_eq!(quote_embedded(r#"a"b\c'd"#), r#""a\"b\\c''d""#);
    }

    #[test]
    fn test_table_falls_back_to_facet_free_name() {
        let mut table = FormatterTable::new();
        table.insert("numeric", FormatterImpl::Decimal(DecimalFormatter::numeric()));
        table.insert(
            "timestamp with time zone",
            FormatterImpl::TimestampTz(TimestampTzFormatter::new(false)),
        );

        assert!(table.get("numeric").is_some());
        assert!(table.get("NUMERIC(10,2)").is_some());
        assert!(table.get("timestamp(3) with time zone").is_some());
        assert!(table.get("money").is_none());
    }

    #[test]
    fn test_strip_keyword_and_cast() {
        assert_eq!(strip_keyword("DATE '2020-01-01'", "DATE"), Some("'2020-01-01'"));
        assert_eq!(strip_keyword("DATETIME", "DATE"), None);
        assert_eq!(strip_cast("'NaN'::real", "real"), "'NaN'");
        assert_eq!(strip_cast("'x'", "real"), "'x'");
    }
}
