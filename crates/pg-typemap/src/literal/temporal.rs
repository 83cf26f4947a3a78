//! Date, time, timestamp and interval formatters.
//!
//! Fractional seconds render with microsecond precision and trailing zeros
//! removed. Years at or before 0 render with a `BC` suffix. The minimum and maximum
//! dates and date-times map to `-infinity` / `infinity` unless legacy timestamp
//! behavior is enabled.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Timelike,
};

use crate::core::{DateTimeKind, DateTimeValue, Value};
use crate::error::{MappingError, Result};

use super::{quote_embedded, unquote_keyword, wrong_shape, LiteralFormatter};

const NEG_INFINITY: &str = "-infinity";
const INFINITY: &str = "infinity";

fn fraction(nanos: u32) -> String {
    let micros = (nanos % 1_000_000_000) / 1_000;
    if micros == 0 {
        return String::new();
    }
    let digits = format!("{:06}", micros);
    format!(".{}", digits.trim_end_matches('0'))
}

/// `YYYY-MM-DD` and whether the year is BC.
fn date_part(date: NaiveDate) -> (String, bool) {
    let year = date.year();
    let (shown, bc) = if year <= 0 { (1 - year, true) } else { (year, false) };
    (
        format!("{:04}-{:02}-{:02}", shown, date.month(), date.day()),
        bc,
    )
}

fn time_part(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}{}",
        time.hour(),
        time.minute(),
        time.second(),
        fraction(time.nanosecond())
    )
}

fn format_date(date: NaiveDate) -> String {
    let (text, bc) = date_part(date);
    if bc {
        format!("{} BC", text)
    } else {
        text
    }
}

/// Date-time text with an optional zone suffix placed before any `BC` marker.
fn format_datetime(value: NaiveDateTime, zone: &str) -> String {
    let (date, bc) = date_part(value.date());
    let mut out = format!("{} {}{}", date, time_part(value.time()), zone);
    if bc {
        out.push_str(" BC");
    }
    out
}

fn format_offset(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    let mut out = format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60);
    if secs % 60 != 0 {
        out.push_str(&format!(":{:02}", secs % 60));
    }
    out
}

/// Offset suffix of a wall-clock time in `tz`; `None` inside a DST gap.
fn zone_suffix<Tz: TimeZone>(tz: &Tz, value: &NaiveDateTime) -> Option<String> {
    tz.from_local_datetime(value)
        .earliest()
        .map(|local| format_offset(&local.offset().fix()))
}

fn split_bc(text: &str) -> (&str, bool) {
    match text.strip_suffix(" BC") {
        Some(rest) => (rest, true),
        None => (text, false),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    match text {
        NEG_INFINITY => return Some(NaiveDate::MIN),
        INFINITY => return Some(NaiveDate::MAX),
        _ => {}
    }
    let (text, bc) = split_bc(text);
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    if bc {
        NaiveDate::from_ymd_opt(1 - date.year(), date.month(), date.day())
    } else {
        Some(date)
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok()
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    let (text, bc) = split_bc(text);
    let (date, time) = text.split_once(' ')?;
    let date = if bc {
        parse_date(&format!("{} BC", date))?
    } else {
        parse_date(date)?
    };
    Some(date.and_time(parse_time(time)?))
}

/// Split `10:30:00+02:00` (or `+05:30:15`) into time text and offset.
fn split_offset(text: &str) -> Option<(&str, FixedOffset)> {
    let pos = text.rfind(['+', '-'])?;
    let (time, offset) = text.split_at(pos);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let mut parts = offset[1..].split(':');
    let hours = parts.next()?.parse::<i32>().ok()?;
    let minutes = parts.next()?.parse::<i32>().ok()?;
    let seconds = match parts.next() {
        Some(s) => s.parse::<i32>().ok()?,
        None => 0,
    };
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let secs = hours * 3600 + minutes * 60 + seconds;
    Some((time, FixedOffset::east_opt(sign * secs)?))
}

/// `DATE '2020-01-31'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatter;

impl DateFormatter {
    fn text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Date(d) if *d == NaiveDate::MIN => Ok(NEG_INFINITY.into()),
            Value::Date(d) if *d == NaiveDate::MAX => Ok(INFINITY.into()),
            Value::Date(d) => Ok(format_date(*d)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }
}

impl LiteralFormatter for DateFormatter {
    fn family(&self) -> &str {
        "date"
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(format!("DATE '{}'", self.text(value)?))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        self.text(value)
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, "DATE", self.family())?;
        parse_date(&text)
            .map(Value::Date)
            .ok_or_else(|| MappingError::invalid_literal(self.family(), literal))
    }
}

/// `TIME '10:30:00.5'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFormatter;

impl LiteralFormatter for TimeFormatter {
    fn family(&self) -> &str {
        "time"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!("TIME '{}'", self.format_embedded(value, store_type)?))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Time(t) => Ok(time_part(*t)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, "TIME", self.family())?;
        parse_time(&text)
            .map(Value::Time)
            .ok_or_else(|| MappingError::invalid_literal(self.family(), literal))
    }
}

/// `TIMETZ '10:30:00+02:00'`, rendered from the time and offset of an offset
/// date-time. Parsing anchors the time on 0001-01-01.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeTzFormatter;

impl LiteralFormatter for TimeTzFormatter {
    fn family(&self) -> &str {
        "time with time zone"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!(
            "TIMETZ '{}'",
            self.format_embedded(value, store_type)?
        ))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::TimestampOffset(dt) => Ok(format!(
                "{}{}",
                time_part(dt.time()),
                format_offset(dt.offset())
            )),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let invalid = || MappingError::invalid_literal(self.family(), literal);
        let text = unquote_keyword(literal, "TIMETZ", self.family())?;
        let (time, offset) = split_offset(&text).ok_or_else(invalid)?;
        let time = parse_time(time).ok_or_else(invalid)?;
        let date = NaiveDate::from_ymd_opt(1, 1, 1).ok_or_else(invalid)?;
        offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(Value::TimestampOffset)
            .ok_or_else(invalid)
    }
}

/// `TIMESTAMP '2020-01-31 10:30:00'`.
///
/// Local and unspecified date-times are written as wall-clock time. A UTC
/// date-time is rejected unless legacy behavior is enabled, since the column
/// would drop the zone it carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampFormatter {
    legacy: bool,
}

impl TimestampFormatter {
    pub fn new(legacy: bool) -> Self {
        Self { legacy }
    }

    fn text(&self, value: &DateTimeValue, store_type: &str) -> Result<String> {
        if !self.legacy {
            if value.is_min() {
                return Ok(NEG_INFINITY.into());
            }
            if value.is_max() {
                return Ok(INFINITY.into());
            }
            if value.kind == DateTimeKind::Utc {
                return Err(MappingError::AmbiguousTemporalKind {
                    kind: value.kind.to_string(),
                    store_type: store_type.to_string(),
                });
            }
        }
        Ok(format_datetime(value.value, ""))
    }
}

impl LiteralFormatter for TimestampFormatter {
    fn family(&self) -> &str {
        "timestamp without time zone"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        match value {
            Value::Timestamp(dt) => Ok(format!("TIMESTAMP '{}'", self.text(dt, store_type)?)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn format_embedded(&self, value: &Value, store_type: &str) -> Result<String> {
        match value {
            Value::Timestamp(dt) => Ok(quote_embedded(&self.text(dt, store_type)?)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, "TIMESTAMP", self.family())?;
        let value = match text.as_str() {
            NEG_INFINITY => DateTimeValue::MIN,
            INFINITY => DateTimeValue::MAX,
            other => parse_naive_datetime(other)
                .map(DateTimeValue::unspecified)
                .ok_or_else(|| MappingError::invalid_literal(self.family(), literal))?,
        };
        Ok(Value::Timestamp(value))
    }
}

/// `TIMESTAMPTZ '2020-01-31 10:30:00Z'`.
///
/// Only UTC date-times and offset date-times are accepted. The sentinel check runs
/// before the kind check, so `MIN`/`MAX` of any kind render as infinities.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampTzFormatter {
    legacy: bool,
}

impl TimestampTzFormatter {
    pub fn new(legacy: bool) -> Self {
        Self { legacy }
    }

    fn text(&self, value: &Value, store_type: &str) -> Result<String> {
        match value {
            Value::Timestamp(dt) => {
                if !self.legacy {
                    if dt.is_min() {
                        return Ok(NEG_INFINITY.into());
                    }
                    if dt.is_max() {
                        return Ok(INFINITY.into());
                    }
                }
                match (dt.kind, self.legacy) {
                    (DateTimeKind::Utc, _) => Ok(format_datetime(dt.value, "Z")),
                    (DateTimeKind::Local, true) => {
                        let zone = zone_suffix(&Local, &dt.value).ok_or_else(|| {
                            MappingError::AmbiguousTemporalKind {
                                kind: dt.kind.to_string(),
                                store_type: store_type.to_string(),
                            }
                        })?;
                        Ok(format_datetime(dt.value, &zone))
                    }
                    (DateTimeKind::Unspecified, true) => Ok(format_datetime(dt.value, "")),
                    (kind, false) => Err(MappingError::AmbiguousTemporalKind {
                        kind: kind.to_string(),
                        store_type: store_type.to_string(),
                    }),
                }
            }
            Value::TimestampOffset(dt) => Ok(format_datetime(
                dt.naive_local(),
                &format_offset(dt.offset()),
            )),
            other => Err(wrong_shape(self.family(), other)),
        }
    }
}

impl LiteralFormatter for TimestampTzFormatter {
    fn family(&self) -> &str {
        "timestamp with time zone"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!("TIMESTAMPTZ '{}'", self.text(value, store_type)?))
    }

    fn format_embedded(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(quote_embedded(&self.text(value, store_type)?))
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let invalid = || MappingError::invalid_literal(self.family(), literal);
        let text = unquote_keyword(literal, "TIMESTAMPTZ", self.family())?;
        match text.as_str() {
            NEG_INFINITY => return Ok(Value::Timestamp(DateTimeValue::MIN)),
            INFINITY => return Ok(Value::Timestamp(DateTimeValue::MAX)),
            _ => {}
        }
        let (body, bc) = split_bc(&text);
        let bc = if bc { " BC" } else { "" };
        if let Some(utc) = body.strip_suffix('Z') {
            let naive = parse_naive_datetime(&format!("{}{}", utc, bc)).ok_or_else(invalid)?;
            return Ok(Value::Timestamp(DateTimeValue::utc(naive)));
        }
        let (date, rest) = body.split_once(' ').ok_or_else(invalid)?;
        let (time, offset) = split_offset(rest).ok_or_else(invalid)?;
        let naive =
            parse_naive_datetime(&format!("{} {}{}", date, time, bc)).ok_or_else(invalid)?;
        let dt: DateTime<FixedOffset> = offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(invalid)?;
        Ok(Value::TimestampOffset(dt))
    }
}

/// `INTERVAL '1 02:00:00'`.
///
/// Days and the fraction appear only when non-zero. A negative interval carries
/// its sign on both the day and time fields, since PostgreSQL signs them
/// independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalFormatter;

impl IntervalFormatter {
    fn text(delta: &TimeDelta) -> String {
        let negative = *delta < TimeDelta::zero();
        let abs = delta.abs();
        let total = abs.num_seconds();
        let days = total / 86_400;
        let clock = format!(
            "{:02}:{:02}:{:02}{}",
            (total % 86_400) / 3_600,
            (total % 3_600) / 60,
            total % 60,
            fraction(abs.subsec_nanos().unsigned_abs())
        );
        let sign = if negative { "-" } else { "" };
        if days == 0 {
            format!("{}{}", sign, clock)
        } else {
            format!("{}{} {}{}", sign, days, sign, clock)
        }
    }

    fn parse_text(text: &str) -> Option<TimeDelta> {
        let (days, clock) = match text.split_once(' ') {
            Some((d, c)) => (d.trim_start_matches('-').parse::<i64>().ok()?, c),
            None => (0, text),
        };
        let negative = text.starts_with('-');
        let clock = clock.trim_start_matches('-');
        let mut parts = clock.splitn(3, ':');
        let hours: i64 = parts.next()?.parse().ok()?;
        let minutes: i64 = parts.next()?.parse().ok()?;
        let seconds = parts.next()?;
        let (whole, frac) = seconds.split_once('.').unwrap_or((seconds, ""));
        let whole: i64 = whole.parse().ok()?;
        let nanos: i64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<9}", frac).get(..9)?.parse().ok()?
        };
        let magnitude = TimeDelta::try_days(days)?
            + TimeDelta::try_hours(hours)?
            + TimeDelta::try_minutes(minutes)?
            + TimeDelta::try_seconds(whole)?
            + TimeDelta::nanoseconds(nanos);
        Some(if negative { -magnitude } else { magnitude })
    }
}

impl LiteralFormatter for IntervalFormatter {
    fn family(&self) -> &str {
        "interval"
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!(
            "INTERVAL '{}'",
            self.format_embedded(value, store_type)?
        ))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::Interval(delta) => Ok(Self::text(delta)),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, "INTERVAL", self.family())?;
        Self::parse_text(&text)
            .map(Value::Interval)
            .ok_or_else(|| MappingError::invalid_literal(self.family(), literal))
    }
}
