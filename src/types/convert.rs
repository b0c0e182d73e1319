//! Value conversion between typed and textual forms
//!
//! Every property value written to or read from an XML attribute, and every
//! enumeration value, passes through a [`ValueConverter`].

use super::values::{Pattern, Value, ValueKind};
use crate::error::{Error, Result};
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;
use url::Url;

/// Date format used for the date kind
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static BOOLEAN_MAP: Lazy<HashMap<&'static str, bool>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("false", false);
    m.insert("0", false);
    m.insert("true", true);
    m.insert("1", true);
    m
});

/// Coerces values between their typed form and text
pub trait ValueConverter: Send + Sync {
    /// Convert text into a value of the given kind
    fn from_text(&self, text: &str, kind: ValueKind) -> Result<Value>;

    /// Convert a value into text
    fn to_text(&self, value: &Value) -> Result<String>;
}

/// Converter for every value kind that has a textual form
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl DefaultConverter {
    /// Create a new converter
    pub fn new() -> Self {
        Self
    }
}

impl ValueConverter for DefaultConverter {
    fn from_text(&self, text: &str, kind: ValueKind) -> Result<Value> {
        match kind {
            ValueKind::Text => Ok(Value::Text(text.to_string())),
            ValueKind::Boolean => BOOLEAN_MAP
                .get(text.trim())
                .copied()
                .map(Value::Boolean)
                .ok_or_else(|| Error::conversion(format!("'{}' is not a valid boolean", text))),
            ValueKind::Integer => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::conversion(format!("'{}' is not a valid integer", text))),
            ValueKind::Decimal => text
                .trim()
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| Error::conversion(format!("'{}' is not a valid decimal", text))),
            ValueKind::Double => parse_double(text.trim()).map(Value::Double),
            ValueKind::Date => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| Error::conversion(format!("'{}' is not a valid date: {}", text, e))),
            ValueKind::DateTime => DateTime::parse_from_rfc3339(text.trim())
                .map(Value::DateTime)
                .map_err(|e| {
                    Error::conversion(format!("'{}' is not a valid date-time: {}", text, e))
                }),
            ValueKind::Timezone => parse_timezone(text.trim()).map(Value::Timezone),
            ValueKind::Uri => Url::parse(text.trim())
                .map(Value::Uri)
                .map_err(|e| Error::conversion(format!("'{}' is not a valid URI: {}", text, e))),
            ValueKind::Bytes => {
                let cleaned: String = text.split_whitespace().collect();
                base64::engine::general_purpose::STANDARD
                    .decode(cleaned)
                    .map(Value::Bytes)
                    .map_err(|_| Error::conversion(format!("'{}' is not valid base64", text)))
            }
            ValueKind::Pattern => Pattern::new(text).map(Value::Pattern),
            ValueKind::Object
            | ValueKind::List
            | ValueKind::Type
            | ValueKind::CollectionHandler => Err(Error::conversion(format!(
                "values of kind {:?} have no textual form",
                kind
            ))),
        }
    }

    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Text(text) => Ok(text.clone()),
            Value::Boolean(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Decimal(d) => Ok(d.to_string()),
            Value::Double(f) => Ok(format_double(*f)),
            Value::Date(d) => Ok(d.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => Ok(dt.to_rfc3339()),
            Value::Timezone(offset) => Ok(format_timezone(offset)),
            Value::Uri(url) => Ok(url.to_string()),
            Value::Bytes(bytes) => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Value::Pattern(pattern) => Ok(pattern.as_str().to_string()),
            Value::Type(ty) => ty.defined_id().map(str::to_string).ok_or_else(|| {
                Error::conversion("a type without a global id has no textual form")
            }),
            Value::List(_) => Err(Error::conversion("lists have no textual form")),
            Value::CollectionHandler(handler) => Err(Error::conversion(format!(
                "collection handler '{}' has no textual form",
                handler.identifier()
            ))),
        }
    }
}

fn parse_double(text: &str) -> Result<f64> {
    match text {
        "NaN" => Ok(f64::NAN),
        "INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse::<f64>()
            .map_err(|_| Error::conversion(format!("'{}' is not a valid double", text))),
    }
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

fn parse_timezone(text: &str) -> Result<FixedOffset> {
    let invalid = || Error::conversion(format!("'{}' is not a valid timezone", text));
    if text == "Z" || text == "UTC" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match text.as_bytes().first() {
        Some(b'+') => (1, &text[1..]),
        Some(b'-') => (-1, &text[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn format_timezone(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    format!("{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::complex::{ComplexType, Type};
    use crate::types::values::CollectionHandler;

    #[test]
    fn test_text_kinds_round_trip() {
        let converter = DefaultConverter::new();
        let cases = [
            ("true", ValueKind::Boolean),
            ("-42", ValueKind::Integer),
            ("12.50", ValueKind::Decimal),
            ("2.5", ValueKind::Double),
            ("2024-02-29", ValueKind::Date),
            ("2024-02-29T10:15:00+02:00", ValueKind::DateTime),
            ("+05:30", ValueKind::Timezone),
            ("UTC", ValueKind::Timezone),
            ("https://example.com/types", ValueKind::Uri),
            ("aGVsbG8=", ValueKind::Bytes),
            ("[A-Z]{2}", ValueKind::Pattern),
        ];
        for (text, kind) in cases {
            let value = converter.from_text(text, kind).unwrap();
            assert_eq!(value.kind(), kind);
            assert_eq!(converter.to_text(&value).unwrap(), text, "kind {:?}", kind);
        }
    }

    #[test]
    fn test_boolean_accepts_digits() {
        let converter = DefaultConverter::new();
        assert_eq!(
            converter.from_text("1", ValueKind::Boolean).unwrap(),
            Value::Boolean(true)
        );
        assert!(converter.from_text("yes", ValueKind::Boolean).is_err());
    }

    #[test]
    fn test_timezone_z_and_negative() {
        let converter = DefaultConverter::new();
        assert_eq!(
            converter.from_text("Z", ValueKind::Timezone).unwrap(),
            converter.from_text("UTC", ValueKind::Timezone).unwrap()
        );
        let value = converter.from_text("-03:00", ValueKind::Timezone).unwrap();
        assert_eq!(converter.to_text(&value).unwrap(), "-03:00");
        assert!(converter.from_text("Europe/Brussels", ValueKind::Timezone).is_err());
        assert!(converter.from_text("+25:00", ValueKind::Timezone).is_err());
    }

    #[test]
    fn test_double_special_values() {
        let converter = DefaultConverter::new();
        let value = converter.from_text("INF", ValueKind::Double).unwrap();
        assert_eq!(converter.to_text(&value).unwrap(), "INF");
    }

    #[test]
    fn test_invalid_text_is_conversion_error() {
        let converter = DefaultConverter::new();
        let err = converter.from_text("abc", ValueKind::Integer).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
        assert!(converter.from_text("2024-13-01", ValueKind::Date).is_err());
    }

    #[test]
    fn test_values_without_text_form() {
        let converter = DefaultConverter::new();
        assert!(converter
            .to_text(&Value::CollectionHandler(CollectionHandler::StringMap))
            .is_err());
        assert!(converter.to_text(&Value::List(vec![])).is_err());
        assert!(converter
            .to_text(&Value::Type(Type::complex(ComplexType::new())))
            .is_err());
        assert_eq!(
            converter
                .to_text(&Value::Type(Type::complex(ComplexType::defined("example.Base"))))
                .unwrap(),
            "example.Base"
        );
        assert!(converter.from_text("x", ValueKind::Object).is_err());
    }
}
