//! Geometric families: `point`, `lseg`, `box`, `line`, `path`, `polygon`, `circle`.

use crate::core::{Circle, Line, LineSegment, Path, PgBox, Point, Polygon, Value};
use crate::error::{MappingError, Result};

use super::{unquote_keyword, wrong_shape, LiteralFormatter};

/// Which geometric type a [`GeometricFormatter`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometricKind {
    Point,
    LineSegment,
    Box,
    Line,
    Path,
    Polygon,
    Circle,
}

impl GeometricKind {
    fn keyword(self) -> &'static str {
        match self {
            GeometricKind::Point => "POINT",
            GeometricKind::LineSegment => "LSEG",
            GeometricKind::Box => "BOX",
            GeometricKind::Line => "LINE",
            GeometricKind::Path => "PATH",
            GeometricKind::Polygon => "POLYGON",
            GeometricKind::Circle => "CIRCLE",
        }
    }

    fn family(self) -> &'static str {
        match self {
            GeometricKind::Point => "point",
            GeometricKind::LineSegment => "lseg",
            GeometricKind::Box => "box",
            GeometricKind::Line => "line",
            GeometricKind::Path => "path",
            GeometricKind::Polygon => "polygon",
            GeometricKind::Circle => "circle",
        }
    }
}

/// `POINT '(1.5,2)'` and friends, using the PostgreSQL text form of each type.
#[derive(Debug, Clone, Copy)]
pub struct GeometricFormatter {
    kind: GeometricKind,
}

impl GeometricFormatter {
    pub fn new(kind: GeometricKind) -> Self {
        Self { kind }
    }

    fn text(&self, value: &Value) -> Result<String> {
        let text = match (self.kind, value) {
            (GeometricKind::Point, Value::Point(p)) => p.to_string(),
            (GeometricKind::LineSegment, Value::LineSegment(s)) => s.to_string(),
            (GeometricKind::Box, Value::Box(b)) => b.to_string(),
            (GeometricKind::Line, Value::Line(l)) => l.to_string(),
            (GeometricKind::Path, Value::Path(p)) => p.to_string(),
            (GeometricKind::Polygon, Value::Polygon(p)) => p.to_string(),
            (GeometricKind::Circle, Value::Circle(c)) => c.to_string(),
            (_, other) => return Err(wrong_shape(self.family(), other)),
        };
        Ok(text)
    }
}

/// All numbers in a geometric text form, in order.
fn numbers(text: &str) -> Option<Vec<f64>> {
    text.split(|c: char| matches!(c, '(' | ')' | '[' | ']' | '<' | '>' | '{' | '}' | ','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect()
}

fn points(coords: &[f64]) -> Option<Vec<Point>> {
    if coords.len() % 2 != 0 {
        return None;
    }
    Some(
        coords
            .chunks(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect(),
    )
}

impl LiteralFormatter for GeometricFormatter {
    fn family(&self) -> &str {
        self.kind.family()
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(format!("{} '{}'", self.kind.keyword(), self.text(value)?))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        self.text(value)
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let invalid = || MappingError::invalid_literal(self.family(), literal);
        let text = unquote_keyword(literal, self.kind.keyword(), self.family())?;
        let n = numbers(&text).ok_or_else(invalid)?;
        let value = match (self.kind, n.as_slice()) {
            (GeometricKind::Point, [x, y]) => Value::Point(Point::new(*x, *y)),
            (GeometricKind::LineSegment, [x1, y1, x2, y2]) => Value::LineSegment(LineSegment {
                start: Point::new(*x1, *y1),
                end: Point::new(*x2, *y2),
            }),
            (GeometricKind::Box, [x1, y1, x2, y2]) => Value::Box(PgBox {
                upper_right: Point::new(*x1, *y1),
                lower_left: Point::new(*x2, *y2),
            }),
            (GeometricKind::Line, [a, b, c]) => Value::Line(Line {
                a: *a,
                b: *b,
                c: *c,
            }),
            (GeometricKind::Circle, [x, y, r]) => Value::Circle(Circle {
                center: Point::new(*x, *y),
                radius: *r,
            }),
            (GeometricKind::Path, coords) => Value::Path(Path {
                points: points(coords).ok_or_else(invalid)?,
                open: text.trim_start().starts_with('['),
            }),
            (GeometricKind::Polygon, coords) => {
                Value::Polygon(Polygon(points(coords).ok_or_else(invalid)?))
            }
            _ => return Err(invalid()),
        };
        Ok(value)
    }
}
