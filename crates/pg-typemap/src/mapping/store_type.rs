//! Store type name normalization and facet parsing.
//!
//! PostgreSQL accepts many spellings for the same type (`int4`, `integer`, `int`)
//! and places facets in odd spots (`timestamp(3) with time zone`). Everything is
//! reduced to one canonical base name plus facets before registry lookup.

use crate::error::{MappingError, Result};

/// Size, precision and scale facets of a store type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Facets {
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl Facets {
    pub fn size(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn precision(precision: u32) -> Self {
        Self {
            precision: Some(precision),
            ..Self::default()
        }
    }

    pub fn numeric(precision: u32, scale: u32) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.precision.is_none() && self.scale.is_none()
    }
}

/// Which facets a base type takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetStyle {
    None,
    /// `varchar(20)`, `bit(8)`.
    Size,
    /// `timestamp(3)`, `interval(6)`.
    Precision,
    /// `numeric(10,2)`.
    PrecisionScale,
}

pub fn facet_style(base: &str) -> FacetStyle {
    match base {
        "character varying" | "character" | "bit" | "bit varying" => FacetStyle::Size,
        "numeric" => FacetStyle::PrecisionScale,
        "time without time zone"
        | "time with time zone"
        | "timestamp without time zone"
        | "timestamp with time zone"
        | "interval" => FacetStyle::Precision,
        _ => FacetStyle::None,
    }
}

/// A parsed store type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTypeName {
    /// Canonical base name without facets or array suffix.
    pub base: String,
    pub facets: Facets,
    /// Number of `[]` suffixes (a leading `_` counts as one).
    pub array_rank: usize,
}

impl StoreTypeName {
    /// The element type name of an array type, facets included.
    pub fn element(&self) -> StoreTypeName {
        StoreTypeName {
            base: self.base.clone(),
            facets: self.facets,
            array_rank: self.array_rank.saturating_sub(1),
        }
    }

    /// Canonical rendering, e.g. `character varying(20)[]`.
    pub fn render(&self) -> String {
        let mut out = render(&self.base, &self.facets);
        for _ in 0..self.array_rank {
            out.push_str("[]");
        }
        out
    }
}

/// Map a lowercase, whitespace-collapsed base name to its canonical spelling.
pub fn normalize(base: &str) -> String {
    let canonical = match base {
        "bool" => "boolean",
        "int2" | "smallserial" | "serial2" => "smallint",
        "int" | "int4" | "serial" | "serial4" => "integer",
        "int8" | "bigserial" | "serial8" => "bigint",
        "float4" => "real",
        "float8" | "float" => "double precision",
        "decimal" => "numeric",
        "varchar" => "character varying",
        "char" | "bpchar" => "character",
        "timestamptz" => "timestamp with time zone",
        "timestamp" => "timestamp without time zone",
        "timetz" => "time with time zone",
        "time" => "time without time zone",
        "varbit" => "bit varying",
        other => other,
    };
    canonical.to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a store type name such as `varchar(20)`, `numeric(10,2)`,
/// `timestamp(3) with time zone`, `integer[]` or `_int4`.
pub fn parse(name: &str) -> Result<StoreTypeName> {
    let invalid = || MappingError::InvalidStoreType(name.to_string());

    let mut text = collapse_whitespace(&name.to_lowercase());
    if text.is_empty() {
        return Err(invalid());
    }

    let mut array_rank = 0;
    while let Some(rest) = text.strip_suffix("[]") {
        text = rest.trim_end().to_string();
        array_rank += 1;
    }
    if array_rank == 0 {
        if let Some(rest) = text.strip_prefix('_') {
            text = rest.to_string();
            array_rank = 1;
        }
    }

    let (base, args) = match text.find('(') {
        Some(open) => {
            let close = open + text[open..].find(')').ok_or_else(invalid)?;
            let args = text[open + 1..close]
                .split(',')
                .map(|a| a.trim().parse::<u32>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>>>()?;
            let base = format!("{} {}", &text[..open], &text[close + 1..]);
            (collapse_whitespace(&base), args)
        }
        None => (text, Vec::new()),
    };
    if base.is_empty() {
        return Err(invalid());
    }

    let base = normalize(&base);
    let facets = match (facet_style(&base), args.as_slice()) {
        (_, []) => Facets::default(),
        (FacetStyle::Size, [n]) => Facets::size(*n),
        (FacetStyle::Precision, [p]) => Facets::precision(*p),
        (FacetStyle::PrecisionScale, [p]) => Facets {
            precision: Some(*p),
            ..Facets::default()
        },
        (FacetStyle::PrecisionScale, [p, s]) if s <= p => Facets::numeric(*p, *s),
        _ => return Err(invalid()),
    };

    Ok(StoreTypeName {
        base,
        facets,
        array_rank,
    })
}

/// Render a canonical base name with its facets.
///
/// Precision on `time`/`timestamp` goes after the first word, matching
/// PostgreSQL's own spelling.
pub fn render(base: &str, facets: &Facets) -> String {
    match facet_style(base) {
        FacetStyle::Size => match facets.size {
            Some(n) => format!("{}({})", base, n),
            None => base.to_string(),
        },
        FacetStyle::PrecisionScale => match (facets.precision, facets.scale) {
            (Some(p), Some(s)) => format!("{}({},{})", base, p, s),
            (Some(p), None) => format!("{}({})", base, p),
            _ => base.to_string(),
        },
        FacetStyle::Precision => match facets.precision {
            Some(p) => match base.split_once(' ') {
                Some((head, tail)) => format!("{}({}) {}", head, p, tail),
                None => format!("{}({})", base, p),
            },
            None => base.to_string(),
        },
        FacetStyle::None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_normalize() {
        assert_eq!(parse("int4").unwrap().base, "integer");
        assert_eq!(parse("INTEGER").unwrap().base, "integer");
        assert_eq!(parse("timestamptz").unwrap().base, "timestamp with time zone");
        assert_eq!(parse("varchar").unwrap().base, "character varying");
        assert_eq!(
            parse("double   precision").unwrap().base,
            "double precision"
        );
    }

    #[test]
    fn test_facets_parse() {
        let t = parse("varchar(20)").unwrap();
        assert_eq!(t.base, "character varying");
        assert_eq!(t.facets, Facets::size(20));

        let t = parse("numeric(10,2)").unwrap();
        assert_eq!(t.facets, Facets::numeric(10, 2));

        let t = parse("timestamp(3) with time zone").unwrap();
        assert_eq!(t.base, "timestamp with time zone");
        assert_eq!(t.facets.precision, Some(3));
    }

    #[test]
    fn test_array_suffixes() {
        let t = parse("integer[]").unwrap();
        assert_eq!((t.base.as_str(), t.array_rank), ("integer", 1));

        let t = parse("_int4").unwrap();
        assert_eq!((t.base.as_str(), t.array_rank), ("integer", 1));

        let t = parse("character varying(20)[]").unwrap();
        assert_eq!(t.array_rank, 1);
        assert_eq!(t.element().render(), "character varying(20)");
    }

    #[test]
    fn test_invalid_names() {
        assert!(parse("").is_err());
        assert!(parse("integer(4)").is_err());
        assert!(parse("numeric(2,5)").is_err());
        assert!(parse("varchar(abc)").is_err());
        assert!(parse("varchar(20").is_err());
    }

    #[test]
    fn test_render_places_precision() {
        assert_eq!(
            render("timestamp with time zone", &Facets::precision(3)),
            "timestamp(3) with time zone"
        );
        assert_eq!(render("interval", &Facets::precision(6)), "interval(6)");
        assert_eq!(render("numeric", &Facets::numeric(10, 2)), "numeric(10,2)");
        assert_eq!(render("text", &Facets::size(5)), "text");
    }
}
