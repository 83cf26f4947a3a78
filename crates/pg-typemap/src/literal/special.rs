//! Bit strings, text search types, `regconfig` and user enums.

use serde::{Deserialize, Serialize};

use crate::core::{BitString, Value};
use crate::error::{MappingError, Result};
use crate::metadata::quote_type_name;

use super::{quote, quote_embedded, unquote_cast, unquote_keyword, wrong_shape, LiteralFormatter};

/// `B'1010'` for `bit(n)` and `bit varying(n)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitFormatter;

impl LiteralFormatter for BitFormatter {
    fn family(&self) -> &str {
        "bit"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!("B'{}'", self.format_embedded(value, store_type)?))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Bits(bits) => Ok(bits.to_string()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let digits = literal
            .trim()
            .strip_prefix("B'")
            .and_then(|rest| rest.strip_suffix('\''))
            .ok_or_else(|| MappingError::invalid_literal(self.family(), literal))?;
        let bits: BitString = digits.parse()?;
        Ok(Value::Bits(bits))
    }
}

/// Which text search type a [`TextSearchFormatter`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSearchKind {
    Vector,
    Query,
}

/// `TSVECTOR '...'` and `TSQUERY '...'` from their canonical text forms.
#[derive(Debug, Clone, Copy)]
pub struct TextSearchFormatter {
    kind: TextSearchKind,
}

impl TextSearchFormatter {
    pub fn new(kind: TextSearchKind) -> Self {
        Self { kind }
    }

    fn keyword(&self) -> &'static str {
        match self.kind {
            TextSearchKind::Vector => "TSVECTOR",
            TextSearchKind::Query => "TSQUERY",
        }
    }

    fn text<'a>(&self, value: &'a Value) -> Result<&'a str> {
        match (self.kind, value) {
            (TextSearchKind::Vector, Value::TsVector(s)) => Ok(s),
            (TextSearchKind::Query, Value::TsQuery(s)) => Ok(s),
            (_, other) => Err(wrong_shape(self.family(), other)),
        }
    }
}

impl LiteralFormatter for TextSearchFormatter {
    fn family(&self) -> &str {
        match self.kind {
            TextSearchKind::Vector => "tsvector",
            TextSearchKind::Query => "tsquery",
        }
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(format!("{} {}", self.keyword(), quote(self.text(value)?)))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(quote_embedded(self.text(value)?))
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, self.keyword(), self.family())?;
        Ok(match self.kind {
            TextSearchKind::Vector => Value::TsVector(text),
            TextSearchKind::Query => Value::TsQuery(text),
        })
    }
}

/// `'english'::regconfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegconfigFormatter;

impl LiteralFormatter for RegconfigFormatter {
    fn family(&self) -> &str {
        "regconfig"
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Text(s) => Ok(format!("{}::regconfig", quote(s))),
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
        unquote_cast(literal, "regconfig", self.family()).map(Value::Text)
    }
}

/// How enum member names map to PostgreSQL enum labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameTranslation {
    /// `VeryHappy` becomes `very_happy`.
    #[default]
    SnakeCase,
    /// Member names are used as labels unchanged.
    None,
}

impl NameTranslation {
    /// Member name to label.
    pub fn to_label(self, member: &str) -> String {
        match self {
            NameTranslation::None => member.to_string(),
            NameTranslation::SnakeCase => to_snake_case(member),
        }
    }

    /// Label back to a member name.
    pub fn to_member(self, label: &str) -> String {
        match self {
            NameTranslation::None => label.to_string(),
            NameTranslation::SnakeCase => label
                .split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect(),
        }
    }
}

fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev != '_'
                    && (prev.is_lowercase()
                        || prev.is_ascii_digit()
                        || (prev.is_uppercase() && next_lower))
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `'label'::type` for a user enum.
///
/// The member name carried by [`Value::Enum`] is translated to a label, which must
/// be one of the enum's labels.
#[derive(Debug, Clone)]
pub struct EnumFormatter {
    labels: Vec<String>,
    translation: NameTranslation,
}

impl EnumFormatter {
    pub fn new(labels: Vec<String>, translation: NameTranslation) -> Self {
        Self {
            labels,
            translation,
        }
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn translation(&self) -> NameTranslation {
        self.translation
    }

    fn label(&self, value: &Value, store_type: &str) -> Result<String> {
        match value {
            Value::Enum(member) => {
                let label = self.translation.to_label(member);
                if self.labels.contains(&label) {
                    Ok(label)
                } else {
                    Err(MappingError::UnknownEnumLabel {
                        store_type: store_type.to_string(),
                        member: member.clone(),
                    })
                }
            }
            other => Err(wrong_shape(self.family(), other)),
        }
    }
}

impl LiteralFormatter for EnumFormatter {
    fn family(&self) -> &str {
        "enum"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!(
            "{}::{}",
            quote(&self.label(value, store_type)?),
            quote_type_name(store_type)?
        ))
    }

    fn format_embedded(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(quote_embedded(&self.label(value, store_type)?))
    }

    fn parse(&self, literal: &str, store_type: &str) -> Result<Value> {
        let label = unquote_cast(literal, &quote_type_name(store_type)?, self.family())?;
        if !self.labels.contains(&label) {
            return Err(MappingError::invalid_literal(store_type, literal));
        }
        Ok(Value::Enum(self.translation.to_member(&label)))
    }
}
