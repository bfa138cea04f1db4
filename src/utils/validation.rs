//! Validation helpers
//!
//! Custom validators plugged into `#[derive(Validate)]` request types and the
//! date parsing shared by the service record endpoints.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

/// Parse a `YYYY-MM-DD` date
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Parse an RFC 3339 timestamp
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Accept either an RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_flexible_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(dt) = validate_datetime(value) {
        return Ok(dt);
    }
    let date = validate_date(value)?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ValidationError::new("date"))
}

/// Serde adapters for request fields holding dates
pub mod flexible_datetime {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_flexible_datetime(&raw)
            .map_err(|_| serde::de::Error::custom(format!("invalid date: '{}'", raw)))
    }

    pub mod option {
        use super::*;

        /// Empty strings and `null` both mean "no date".
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => parse_flexible_datetime(&s)
                    .map(Some)
                    .map_err(|_| serde::de::Error::custom(format!("invalid date: '{}'", s))),
            }
        }
    }
}

pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// At least 8 characters, one letter and one digit
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    let long_enough = value.chars().count() >= 8;
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());

    if !(long_enough && has_letter && has_digit) {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Password must be at least 8 characters and include a number and a letter".into(),
        );
        return Err(error);
    }
    Ok(())
}

pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), value);
        error.message = Some("must be a positive number".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Largest number of cents a `NUMERIC(12, 2)` column holds, plus one
const MONEY_LIMIT_CENTS: i64 = 1_000_000_000_000;

/// Amount that fits a `NUMERIC(12, 2)` column without rounding
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > 2 {
        let mut error = ValidationError::new("money_scale");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("must have at most 2 decimal places".into());
        return Err(error);
    }
    if value.abs() >= Decimal::new(MONEY_LIMIT_CENTS, 2) {
        let mut error = ValidationError::new("money_range");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("must be less than 10000000000".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_parse_flexible_datetime() {
        let from_date = parse_flexible_datetime("2024-02-15").unwrap();
        assert_eq!(from_date, Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap());

        let from_rfc = parse_flexible_datetime("2024-02-15T10:30:00+02:00").unwrap();
        assert_eq!(from_rfc, Utc.with_ymd_and_hms(2024, 2, 15, 8, 30, 0).unwrap());

        assert!(parse_flexible_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_flexible_datetime_option_treats_blank_as_none() {
        #[derive(Deserialize)]
        struct Dated {
            #[serde(default, deserialize_with = "flexible_datetime::option::deserialize")]
            at: Option<DateTime<Utc>>,
        }

        let blank: Dated = serde_json::from_str(r#"{"at": ""}"#).unwrap();
        assert!(blank.at.is_none());
        let null: Dated = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(null.at.is_none());
        let missing: Dated = serde_json::from_str("{}").unwrap();
        assert!(missing.at.is_none());
        let set: Dated = serde_json::from_str(r#"{"at": "2024-03-01"}"#).unwrap();
        assert!(set.at.is_some());
        assert!(serde_json::from_str::<Dated>(r#"{"at": "soon"}"#).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Quick Lube").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("secret123").is_ok());
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("lettersonly").is_err());
        assert!(validate_password_strength("123456789").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(&Decimal::new(4999, 2)).is_ok());
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&-5).is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money(&Decimal::new(12050, 2)).is_ok());
        assert!(validate_money(&Decimal::new(1_205_000, 4)).is_ok());
        assert!(validate_money(&Decimal::new(999_999_999_999, 2)).is_ok());

        assert!(validate_money(&Decimal::new(1, 3)).is_err());
        assert!(validate_money(&Decimal::new(10_000_000_000, 0)).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(&0).is_ok());
        assert!(validate_non_negative(&120_000).is_ok());
        assert!(validate_non_negative(&-1).is_err());
    }
}
