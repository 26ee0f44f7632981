//! Bidirectional conversion between typed scalar values and their
//! canonical text representation.
//!
//! Both traversal engines share this codec: extraction renders instance
//! values for the custom location, injection parses collected text back
//! into typed values. Text forms are the document-attribute forms of the
//! format (base64 binary, RFC 3339 date-times, `INF`/`-INF`/`NaN`
//! floats), never bespoke.

use crate::{
    error::{InternalError, MappingError},
    value::Value,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use plumage_schema::kind::PrimitiveKind;
use rust_decimal::Decimal;
use std::{str::FromStr, sync::OnceLock};
use time::{
    Duration, OffsetDateTime, PrimitiveDateTime,
    format_description::{OwnedFormatItem, well_known::Rfc3339},
};

static DATETIME_FORMAT: OnceLock<OwnedFormatItem> = OnceLock::new();

fn datetime_format() -> &'static OwnedFormatItem {
    DATETIME_FORMAT.get_or_init(|| {
        time::format_description::parse_owned::<2>(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]",
        )
        .unwrap()
    })
}

///
/// EncodedText
///
/// Rendered text plus the whitespace marker callers must honor explicitly
/// (a custom location keeps leading/trailing whitespace only when told to
/// preserve it).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedText {
    pub text: String,
    pub preserve_whitespace: bool,
}

impl EncodedText {
    fn plain(text: String) -> Self {
        Self {
            text,
            preserve_whitespace: false,
        }
    }
}

/// Render a runtime scalar as canonical text, dispatching on the value's
/// runtime kind.
pub fn value_to_text(value: &Value) -> Result<EncodedText, MappingError> {
    let encoded = match value {
        Value::Bool(b) => EncodedText::plain(b.to_string()),
        Value::Int8(i) => EncodedText::plain(i.to_string()),
        Value::Int16(i) => EncodedText::plain(i.to_string()),
        Value::Int32(i) => EncodedText::plain(i.to_string()),
        Value::Int64(i) => EncodedText::plain(i.to_string()),
        Value::Float32(f) => EncodedText::plain(format_float(f64::from(*f))),
        Value::Float64(f) => EncodedText::plain(format_float(*f)),
        Value::Decimal(d) => EncodedText::plain(d.to_string()),
        Value::DateTime(dt) => EncodedText::plain(format_datetime(*dt)),
        Value::DateTimeOffset(dt) => EncodedText::plain(
            dt.format(&Rfc3339)
                .map_err(|e| InternalError::codec_invariant(format!("rfc3339 render: {e}")))?,
        ),
        Value::Guid(g) => EncodedText::plain(g.to_string()),
        Value::Binary(bytes) => EncodedText::plain(BASE64.encode(bytes)),
        Value::Duration(d) => EncodedText::plain(format_duration(*d)),
        Value::Text(s) => EncodedText {
            preserve_whitespace: has_boundary_whitespace(s),
            text: s.clone(),
        },
    };

    Ok(encoded)
}

/// Parse text into a scalar of the *target* primitive kind.
///
/// Failures carry the target kind and the offending text; target kinds
/// with no text representation signal an internal error instead.
pub fn text_to_value(text: &str, target: PrimitiveKind) -> Result<Value, MappingError> {
    let fail = || MappingError::TextNotConvertible {
        target,
        text: text.to_string(),
    };

    let value = match target {
        PrimitiveKind::Bool => match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(fail()),
        },
        PrimitiveKind::Int8 => Value::Int8(text.parse().map_err(|_| fail())?),
        PrimitiveKind::Int16 => Value::Int16(text.parse().map_err(|_| fail())?),
        PrimitiveKind::Int32 => Value::Int32(text.parse().map_err(|_| fail())?),
        PrimitiveKind::Int64 => Value::Int64(text.parse().map_err(|_| fail())?),
        PrimitiveKind::Float32 => match text {
            "INF" => Value::Float32(f32::INFINITY),
            "-INF" => Value::Float32(f32::NEG_INFINITY),
            "NaN" => Value::Float32(f32::NAN),
            _ => Value::Float32(text.parse().map_err(|_| fail())?),
        },
        PrimitiveKind::Float64 => Value::Float64(parse_float(text).ok_or_else(fail)?),
        PrimitiveKind::Decimal => Value::Decimal(Decimal::from_str(text).map_err(|_| fail())?),
        PrimitiveKind::DateTime => Value::DateTime(
            PrimitiveDateTime::parse(text, datetime_format()).map_err(|_| fail())?,
        ),
        PrimitiveKind::DateTimeOffset => {
            Value::DateTimeOffset(OffsetDateTime::parse(text, &Rfc3339).map_err(|_| fail())?)
        }
        PrimitiveKind::Guid => Value::Guid(text.parse().map_err(|_| fail())?),
        PrimitiveKind::Binary => Value::Binary(BASE64.decode(text).map_err(|_| fail())?),
        PrimitiveKind::Text => Value::Text(text.to_string()),
        PrimitiveKind::Duration => Value::Duration(parse_duration(text).ok_or_else(fail)?),
        PrimitiveKind::Stream | PrimitiveKind::Geography | PrimitiveKind::Geometry => {
            return Err(InternalError::codec_unsupported(target).into());
        }
    };

    Ok(value)
}

fn has_boundary_whitespace(s: &str) -> bool {
    let first = s.chars().next().is_some_and(char::is_whitespace);
    let last = s.chars().next_back().is_some_and(char::is_whitespace);
    first || last
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f.is_sign_positive() { "INF" } else { "-INF" }.to_string()
    } else {
        f.to_string()
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => text.parse().ok(),
    }
}

fn parse_digits(chunk: &str) -> Option<i64> {
    if chunk.is_empty() || !chunk.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    chunk.parse().ok()
}

fn format_datetime(dt: PrimitiveDateTime) -> String {
    let mut out = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    );
    push_fraction(&mut out, dt.nanosecond());
    out
}

fn push_fraction(out: &mut String, nanos: u32) {
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
}

/// Canonical `PnDTnHnMn.fS` rendering; zero components are omitted and the
/// zero duration renders as `PT0S`.
fn format_duration(d: Duration) -> String {
    let mut out = String::new();
    if d.is_negative() {
        out.push('-');
    }
    out.push('P');

    let total = d.abs();
    let days = total.whole_days();
    let hours = total.whole_hours() % 24;
    let minutes = total.whole_minutes() % 60;
    let seconds = total.whole_seconds() % 60;
    let nanos = total.subsec_nanoseconds();

    if days > 0 {
        out.push_str(&format!("{days}D"));
    }

    let sub_day = hours > 0 || minutes > 0 || seconds > 0 || nanos > 0;
    if sub_day || days == 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 || nanos > 0 || !sub_day {
            out.push_str(&seconds.to_string());
            push_fraction(&mut out, u32::try_from(nanos).unwrap_or(0));
            out.push('S');
        }
    }

    out
}

fn parse_duration(text: &str) -> Option<Duration> {
    let (negative, rest) = text
        .strip_prefix('-')
        .map_or((false, text), |r| (true, r));
    let rest = rest.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (rest, None),
    };

    let mut seconds: i64 = 0;
    let mut nanos: i32 = 0;
    let mut any = false;

    if !date_part.is_empty() {
        let days = parse_digits(date_part.strip_suffix('D')?)?;
        seconds = seconds.checked_add(days.checked_mul(86_400)?)?;
        any = true;
    }

    if let Some(time_part) = time_part {
        if time_part.is_empty() {
            return None;
        }
        let mut rest = time_part;
        for (unit, factor) in [('H', 3_600i64), ('M', 60), ('S', 1)] {
            let Some(end) = rest.find(unit) else {
                continue;
            };
            let chunk = &rest[..end];
            rest = &rest[end + 1..];
            any = true;

            if unit == 'S' {
                let (whole, frac) = match chunk.split_once('.') {
                    Some((w, f)) => (w, Some(f)),
                    None => (chunk, None),
                };
                let s = parse_digits(whole)?;
                seconds = seconds.checked_add(s.checked_mul(factor)?)?;
                if let Some(frac) = frac {
                    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit())
                    {
                        return None;
                    }
                    let padded = format!("{frac:0<9}");
                    nanos = padded.parse().ok()?;
                }
            } else {
                let n = parse_digits(chunk)?;
                seconds = seconds.checked_add(n.checked_mul(factor)?)?;
            }
        }
        if !rest.is_empty() {
            return None;
        }
    }

    if !any {
        return None;
    }

    let duration = Duration::new(seconds, nanos);
    Some(if negative { -duration } else { duration })
}

///
/// TESTS
///
