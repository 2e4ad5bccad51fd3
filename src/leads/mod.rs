//! Lead workflows that sit between the HTTP handlers and the store.
//!
//! Handlers parse requests and shape responses; everything that decides
//! *what* happens to a lead lives here so it can be tested against the
//! in-memory store.

pub mod dashboard;
pub mod detail;
pub mod followups;
pub mod linking;
pub mod notes;
pub mod reports;

use chrono::NaiveDate;
use serde::Deserialize;

/// Source of "today" for date-relative views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The server's local calendar date
    #[default]
    Local,
    /// A pinned date
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Clock::Local => chrono::Local::now().date_naive(),
            Clock::Fixed(date) => date,
        }
    }
}

/// A request value that failed validation; surfaces as a 400
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Invalid(pub String);

/// Identifier fields arrive as JSON numbers or as strings from form inputs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    /// The id, `None` for an empty string
    pub fn resolve(&self, field: &str) -> Result<Option<i64>, Invalid> {
        match self {
            IdValue::Number(id) => Ok(Some(*id)),
            IdValue::Text(text) if text.trim().is_empty() => Ok(None),
            IdValue::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Invalid(format!("Invalid {field}: {text}"))),
        }
    }
}

/// Resolve an optional id field; a missing field and an empty one are the same
pub fn optional_id(value: Option<&IdValue>, field: &str) -> Result<Option<i64>, Invalid> {
    value.map_or(Ok(None), |v| v.resolve(field))
}

/// Treat empty and whitespace-only strings as absent
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional `YYYY-MM-DD` value
pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, Invalid> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Invalid(format!("Invalid {field}: expected YYYY-MM-DD"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_value_forms() {
        let number: IdValue = serde_json::from_str("42").unwrap();
        let text: IdValue = serde_json::from_str("\"42\"").unwrap();
        let empty: IdValue = serde_json::from_str("\"\"").unwrap();
        assert_eq!(number.resolve("enqid").unwrap(), Some(42));
        assert_eq!(text.resolve("enqid").unwrap(), Some(42));
        assert_eq!(empty.resolve("enqid").unwrap(), None);

        let bad: IdValue = serde_json::from_str("\"4x\"").unwrap();
        assert!(bad.resolve("enqid").unwrap_err().0.contains("enqid"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("fromDate", None).unwrap(), None);
        assert_eq!(parse_date("fromDate", Some("")).unwrap(), None);
        assert_eq!(
            parse_date("fromDate", Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date("fromDate", Some("29/02/2024")).is_err());
        assert!(parse_date("toDate", Some("2023-02-29")).is_err());
    }

    #[test]
    fn test_present() {
        assert_eq!(present(Some("  ".into())), None);
        assert_eq!(present(Some("CP".into())), Some("CP".into()));
        assert_eq!(present(None), None);
    }
}
