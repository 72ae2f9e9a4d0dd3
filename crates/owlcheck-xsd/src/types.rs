//! Lexical-space checkers for the supported XSD primitive and derived types

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use regex::{Captures, Regex};

const TIMEZONE: &str = r"(?P<tz>Z|[+-](?P<tzh>\d{2}):(?P<tzm>\d{2}))?";
const DATE: &str = r"(?P<year>-?\d{4,})-(?P<month>\d{2})-(?P<day>\d{2})";
const TIME: &str = r"(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})(?:\.\d+)?";
const NCNAME: &str = r"[\p{L}_][\p{L}\p{N}_.\-]*";

/// Calendar components a temporal value must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Temporal {
    DateTime,
    Date,
    Time,
    GYear,
    GYearMonth,
}

#[derive(Debug)]
enum Lexical {
    /// Every string is in the lexical space
    Any,
    Pattern(Regex),
    Integer {
        pattern: Regex,
        min: Option<i128>,
        max: Option<i128>,
    },
    Temporal {
        pattern: Regex,
        temporal: Temporal,
        timezone_required: bool,
    },
    Duration(Regex),
    Base64,
}

/// Checker for one XSD type, built once and cached by the validator
#[derive(Debug)]
pub struct CompiledType {
    local_name: String,
    lexical: Lexical,
}

impl CompiledType {
    /// Local name within the XSD namespace, e.g. `integer`
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// True if `value` is in the type's lexical space.
    ///
    /// Leading and trailing whitespace is collapsed first, as XML Schema does
    /// for every type outside the string family.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match &self.lexical {
            Lexical::Any => true,
            Lexical::Pattern(pattern) => pattern.is_match(value),
            Lexical::Integer { pattern, min, max } => {
                pattern.is_match(value) && integer_in_range(value, *min, *max)
            }
            Lexical::Temporal {
                pattern,
                temporal,
                timezone_required,
            } => match pattern.captures(value) {
                Some(caps) => {
                    (!timezone_required || caps.name("tz").is_some())
                        && valid_temporal(&caps, *temporal)
                }
                None => false,
            },
            Lexical::Duration(pattern) => {
                pattern.is_match(value) && !value.ends_with('P') && !value.ends_with('T')
            }
            Lexical::Base64 => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                STANDARD.decode(compact.as_bytes()).is_ok()
            }
        }
    }
}

/// Build the checker for an XSD local name.
///
/// `Ok(None)` means the name is not a supported XSD type.
pub fn compile(local_name: &str) -> Result<Option<CompiledType>, regex::Error> {
    let lexical = match local_name {
        // whitespace=replace/collapse puts every string in these lexical spaces
        "string" | "normalizedString" | "token" | "anyURI" => Lexical::Any,
        "language" => pattern(r"[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*")?,
        "Name" => pattern(r"[\p{L}_:][\p{L}\p{N}_:.\-]*")?,
        "NCName" => pattern(NCNAME)?,
        "NMTOKEN" => pattern(r"[\p{L}\p{N}_:.\-]+")?,
        "QName" => pattern(&format!("({0}:)?{0}", NCNAME))?,
        "boolean" => pattern("true|false|1|0")?,
        "decimal" => pattern(r"[+-]?(\d+(\.\d*)?|\.\d+)")?,
        "float" | "double" => pattern(r"[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?|[+-]?INF|NaN")?,
        "integer" => integer(None, None)?,
        "nonNegativeInteger" => integer(Some(0), None)?,
        "positiveInteger" => integer(Some(1), None)?,
        "nonPositiveInteger" => integer(None, Some(0))?,
        "negativeInteger" => integer(None, Some(-1))?,
        "long" => integer(Some(i64::MIN as i128), Some(i64::MAX as i128))?,
        "int" => integer(Some(i32::MIN as i128), Some(i32::MAX as i128))?,
        "short" => integer(Some(i16::MIN as i128), Some(i16::MAX as i128))?,
        "byte" => integer(Some(i8::MIN as i128), Some(i8::MAX as i128))?,
        "unsignedLong" => integer(Some(0), Some(u64::MAX as i128))?,
        "unsignedInt" => integer(Some(0), Some(u32::MAX as i128))?,
        "unsignedShort" => integer(Some(0), Some(u16::MAX as i128))?,
        "unsignedByte" => integer(Some(0), Some(u8::MAX as i128))?,
        "dateTime" => temporal(&format!("{}T{}{}", DATE, TIME, TIMEZONE), Temporal::DateTime, false)?,
        "dateTimeStamp" => temporal(&format!("{}T{}{}", DATE, TIME, TIMEZONE), Temporal::DateTime, true)?,
        "date" => temporal(&format!("{}{}", DATE, TIMEZONE), Temporal::Date, false)?,
        "time" => temporal(&format!("{}{}", TIME, TIMEZONE), Temporal::Time, false)?,
        "gYear" => temporal(&format!(r"(?P<year>-?\d{{4,}}){}", TIMEZONE), Temporal::GYear, false)?,
        "gYearMonth" => temporal(
            &format!(r"(?P<year>-?\d{{4,}})-(?P<month>\d{{2}}){}", TIMEZONE),
            Temporal::GYearMonth,
            false,
        )?,
        "duration" => Lexical::Duration(anchored(
            r"-?P(\d+Y)?(\d+M)?(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?",
        )?),
        "hexBinary" => pattern("([0-9a-fA-F]{2})*")?,
        "base64Binary" => Lexical::Base64,
        _ => return Ok(None),
    };
    Ok(Some(CompiledType {
        local_name: local_name.to_string(),
        lexical,
    }))
}

fn anchored(expression: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", expression))
}

fn pattern(expression: &str) -> Result<Lexical, regex::Error> {
    Ok(Lexical::Pattern(anchored(expression)?))
}

fn integer(min: Option<i128>, max: Option<i128>) -> Result<Lexical, regex::Error> {
    Ok(Lexical::Integer {
        pattern: anchored(r"[+-]?\d+")?,
        min,
        max,
    })
}

fn temporal(expression: &str, temporal: Temporal, timezone_required: bool) -> Result<Lexical, regex::Error> {
    Ok(Lexical::Temporal {
        pattern: anchored(expression)?,
        temporal,
        timezone_required,
    })
}

fn integer_in_range(value: &str, min: Option<i128>, max: Option<i128>) -> bool {
    match value.parse::<i128>() {
        Ok(n) => min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m),
        // Too many digits for i128: only unbounded sides can hold it
        Err(_) if value.starts_with('-') => min.is_none(),
        Err(_) => max.is_none(),
    }
}

fn number(caps: &Captures<'_>, name: &str) -> Option<i64> {
    caps.name(name)?.as_str().parse().ok()
}

fn valid_temporal(caps: &Captures<'_>, temporal: Temporal) -> bool {
    let date_ok = match temporal {
        Temporal::DateTime | Temporal::Date => valid_date(caps),
        Temporal::GYearMonth => number(caps, "month").map_or(false, |m| (1..=12).contains(&m)),
        Temporal::GYear | Temporal::Time => true,
    };
    let time_ok = match temporal {
        Temporal::DateTime | Temporal::Time => valid_time(caps),
        _ => true,
    };
    date_ok && time_ok && valid_timezone(caps)
}

fn valid_date(caps: &Captures<'_>) -> bool {
    let (Some(year), Some(month), Some(day)) = (
        number(caps, "year"),
        number(caps, "month"),
        number(caps, "day"),
    ) else {
        return false;
    };
    match (i32::try_from(year), u32::try_from(month), u32::try_from(day)) {
        (Ok(year), Ok(month), Ok(day)) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
        _ => false,
    }
}

fn valid_time(caps: &Captures<'_>) -> bool {
    let (Some(hour), Some(minute), Some(second)) = (
        number(caps, "hour"),
        number(caps, "minute"),
        number(caps, "second"),
    ) else {
        return false;
    };
    if hour == 24 {
        // 24:00:00 is end of day
        return minute == 0 && second == 0;
    }
    hour < 24 && minute < 60 && second < 60
}

fn valid_timezone(caps: &Captures<'_>) -> bool {
    match (number(caps, "tzh"), number(caps, "tzm")) {
        (Some(hours), Some(minutes)) => {
            minutes < 60 && (hours < 14 || (hours == 14 && minutes == 0))
        }
        _ => true,
    }
}
