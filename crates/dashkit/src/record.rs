//! Field access for filterable records.
//!
//! Views in this crate never look at concrete domain types. Anything that can
//! answer "what is the value of field `name`?" implements [`Record`] and can be
//! searched, filtered by status and date, and sorted.
//!
//! Implementations are provided for JSON objects (`serde_json::Map` and
//! `serde_json::Value`) and for `BTreeMap<String, FieldValue>`.
//!
//! # Example
//!
//! ```rust
//! use dashkit::record::{FieldValue, Record};
//! use serde_json::json;
//!
//! let broker = json!({ "name": "Ada Park", "deals": 12, "active": true });
//! assert_eq!(broker.field("name"), Some(FieldValue::from("Ada Park")));
//! assert_eq!(broker.field("deals"), Some(FieldValue::Number(12.0)));
//! assert_eq!(broker.field("missing"), None);
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single field value.
///
/// Absent and JSON `null` fields are represented by `None` at the
/// [`Record::field`] level, never by a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue<'a> {
    /// Boolean flag.
    Bool(bool),
    /// Any numeric value.
    Number(f64),
    /// Text, including date-like strings.
    Text(Cow<'a, str>),
}

impl FieldValue<'_> {
    /// Renders the value as text, the form used for substring search.
    ///
    /// Whole numbers print without a fractional part (`5`, not `5.0`).
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Text(s) => Cow::Borrowed(s.as_ref()),
        }
    }

    /// Interprets the value as a point in time.
    ///
    /// Text is parsed with [`parse_timestamp`]; numbers are epoch milliseconds.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "epoch millis fit in i64")]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(s) => parse_timestamp(s).ok(),
            Self::Number(n) if n.is_finite() => Utc.timestamp_millis_opt(*n as i64).single(),
            _ => None,
        }
    }

    /// Converts into a value that owns its text.
    #[must_use]
    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            Self::Bool(b) => FieldValue::Bool(b),
            Self::Number(n) => FieldValue::Number(n),
            Self::Text(s) => FieldValue::Text(Cow::Owned(s.into_owned())),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }
}

impl From<String> for FieldValue<'static> {
    fn from(s: String) -> Self {
        Self::Text(Cow::Owned(s))
    }
}

impl From<f64> for FieldValue<'static> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue<'static> {
    #[expect(clippy::cast_precision_loss, reason = "record numbers are f64 like JSON")]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for FieldValue<'static> {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Orders two optional field values.
///
/// Same-kind values use their native order: `false < true`, numbers by
/// [`f64::total_cmp`], text by code point. Across kinds the rank is
/// absent < bool < number < text. Two absent values are equal.
#[must_use]
pub fn compare_fields(a: Option<&FieldValue<'_>>, b: Option<&FieldValue<'_>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(FieldValue::Bool(x)), Some(FieldValue::Bool(y))) => x.cmp(y),
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => x.total_cmp(y),
        (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.kind_rank().cmp(&y.kind_rank()),
    }
}

#[expect(clippy::cast_possible_truncation, reason = "guarded by the range check")]
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// Anything whose fields can be looked up by name.
pub trait Record {
    /// Returns the value of `name`, or `None` when absent or null.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.get(name).and_then(json_field)
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.as_object().and_then(|map| map.field(name))
    }
}

impl Record for BTreeMap<String, FieldValue<'static>> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.get(name).map(|value| match value {
            FieldValue::Bool(b) => FieldValue::Bool(*b),
            FieldValue::Number(n) => FieldValue::Number(*n),
            FieldValue::Text(s) => FieldValue::Text(Cow::Borrowed(s.as_ref())),
        })
    }
}

fn json_field(value: &Value) -> Option<FieldValue<'_>> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(FieldValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => Some(FieldValue::Text(Cow::Borrowed(s))),
        Value::Array(_) | Value::Object(_) => {
            Some(FieldValue::Text(Cow::Owned(value.to_string())))
        }
    }
}

/// Error returned when a string is not a recognized date or timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date or timestamp: {0:?}")]
pub struct ParseDateError(pub String);

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp in the forms stored by typical backends.
///
/// Accepted, in order: RFC 3339 (`2024-03-05T10:00:00Z`), Postgres style with a
/// short offset (`2024-03-05 10:00:00+00`), naive date-times (taken as UTC) and
/// bare dates (midnight UTC).
///
/// # Errors
///
/// Returns [`ParseDateError`] if none of the forms match.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ParseDateError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(start_of_day(date));
    }

    Err(ParseDateError(s.to_string()))
}

/// Parses an inclusive lower range bound. A bare date means the start of that day.
///
/// # Errors
///
/// Returns [`ParseDateError`] for unrecognized input.
pub fn parse_lower_bound(s: &str) -> Result<DateTime<Utc>, ParseDateError> {
    parse_timestamp(s)
}

/// Parses an inclusive upper range bound. A bare date means the end of that day.
///
/// # Errors
///
/// Returns [`ParseDateError`] for unrecognized input.
pub fn parse_upper_bound(s: &str) -> Result<DateTime<Utc>, ParseDateError> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(end_of_day(date)),
        Err(_) => parse_timestamp(s),
    }
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The last representable nanosecond of `date` in UTC.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_json_field_kinds() {
        let record = json!({
            "name": "Ada",
            "price": 450000.5,
            "featured": false,
            "notes": null,
            "tags": ["a", "b"]
        });

        assert_eq!(record.field("name"), Some(FieldValue::from("Ada")));
        assert_eq!(record.field("price"), Some(FieldValue::Number(450_000.5)));
        assert_eq!(record.field("featured"), Some(FieldValue::Bool(false)));
        assert_eq!(record.field("notes"), None);
        assert_eq!(record.field("absent"), None);
        assert_eq!(
            record.field("tags").map(|v| v.to_text().into_owned()),
            Some(r#"["a","b"]"#.to_string())
        );
    }

    #[test]
    fn test_non_object_json_has_no_fields() {
        assert_eq!(json!(42).field("name"), None);
    }

    #[test]
    fn test_btreemap_record() {
        let mut record = BTreeMap::new();
        record.insert("status".to_string(), FieldValue::from("active".to_string()));
        record.insert("deals".to_string(), FieldValue::from(3_i64));

        assert_eq!(record.field("status"), Some(FieldValue::from("active")));
        assert_eq!(record.field("deals"), Some(FieldValue::Number(3.0)));
    }

    #[test]
    fn test_to_text_numbers() {
        assert_eq!(FieldValue::Number(5.0).to_text(), "5");
        assert_eq!(FieldValue::Number(-12.0).to_text(), "-12");
        assert_eq!(FieldValue::Number(2.5).to_text(), "2.5");
        assert_eq!(FieldValue::Bool(true).to_text(), "true");
    }

    #[test]
    fn test_compare_same_kind() {
        let a = FieldValue::Number(1.0);
        let b = FieldValue::Number(2.0);
        assert_eq!(compare_fields(Some(&a), Some(&b)), Ordering::Less);

        let x = FieldValue::from("apple");
        let y = FieldValue::from("banana");
        assert_eq!(compare_fields(Some(&y), Some(&x)), Ordering::Greater);

        assert_eq!(
            compare_fields(Some(&FieldValue::Bool(false)), Some(&FieldValue::Bool(true))),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_across_kinds() {
        let flag = FieldValue::Bool(true);
        let num = FieldValue::Number(-1.0);
        let text = FieldValue::from("0");

        assert_eq!(compare_fields(None, Some(&flag)), Ordering::Less);
        assert_eq!(compare_fields(Some(&flag), Some(&num)), Ordering::Less);
        assert_eq!(compare_fields(Some(&num), Some(&text)), Ordering::Less);
        assert_eq!(compare_fields(None, None), Ordering::Equal);
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let rfc = parse_timestamp("2024-03-05T10:00:00Z").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-03-05T10:00:00+00:00");

        let offset = parse_timestamp("2024-03-05T12:00:00+02:00").unwrap();
        assert_eq!(offset, rfc);

        let postgres = parse_timestamp("2024-03-05 10:00:00.123+00").unwrap();
        assert_eq!(postgres.timestamp(), rfc.timestamp());

        let naive = parse_timestamp("2024-03-05 10:00:00").unwrap();
        assert_eq!(naive, rfc);

        let date = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(date.day(), 5);
        assert_eq!(date.timestamp() % 86_400, 0);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(
            parse_timestamp("next tuesday"),
            Err(ParseDateError("next tuesday".to_string()))
        );
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_range_bounds() {
        let lower = parse_lower_bound("2024-03-01").unwrap();
        let upper = parse_upper_bound("2024-03-31").unwrap();
        assert_eq!(lower.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(upper > parse_timestamp("2024-03-31T23:59:59Z").unwrap());
        assert!(upper >= parse_timestamp("2024-03-31T23:59:59.9995Z").unwrap());
        assert!(upper >= parse_timestamp("2024-03-31 23:59:59.999999+00").unwrap());
        assert!(upper < parse_timestamp("2024-04-01T00:00:00Z").unwrap());

        let exact = parse_upper_bound("2024-03-31T12:00:00Z").unwrap();
        assert_eq!(exact.to_rfc3339(), "2024-03-31T12:00:00+00:00");
    }

    #[test]
    fn test_as_timestamp() {
        let text = FieldValue::from("2024-01-15");
        assert!(text.as_timestamp().is_some());

        let millis = FieldValue::Number(0.0);
        assert_eq!(millis.as_timestamp().map(|t| t.timestamp()), Some(0));

        assert_eq!(FieldValue::Bool(true).as_timestamp(), None);
        assert_eq!(FieldValue::from("soon").as_timestamp(), None);
    }
}
