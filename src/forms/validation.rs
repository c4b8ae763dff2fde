//! Field validation rules.
//!
//! A form's rule list is checked in order and stops at the first violation,
//! so the user always sees one message at a time.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::Fields;
use crate::jobs::parse_datetime;

lazy_static! {
    /// Something, an `@`, something, a dot, something. No whitespace.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// One validation step over the form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Every listed field is non-empty; one shared message
    AllPresent {
        fields: &'static [&'static str],
        message: &'static str,
    },
    /// Every listed field is non-empty, checked in order; the message names
    /// the first missing field
    EachPresent { fields: &'static [&'static str] },
    Email { field: &'static str },
    MinLength {
        field: &'static str,
        min: usize,
        message: &'static str,
    },
    HasUppercase {
        field: &'static str,
        message: &'static str,
    },
    SameAs {
        field: &'static str,
        other: &'static str,
        message: &'static str,
    },
    FiniteNumber {
        field: &'static str,
        message: &'static str,
    },
    CalendarDate {
        field: &'static str,
        message: &'static str,
    },
}

impl Rule {
    pub fn check(&self, fields: &Fields) -> Result<(), String> {
        let get = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");

        match *self {
            Rule::AllPresent { fields: names, message } => {
                if names.iter().any(|n| get(n).is_empty()) {
                    return Err(message.to_string());
                }
            }
            Rule::EachPresent { fields: names } => {
                if let Some(missing) = names.iter().find(|n| get(n).is_empty()) {
                    return Err(format!("The {} is required to fill!", missing));
                }
            }
            Rule::Email { field } => validate_email(get(field))?,
            Rule::MinLength { field, min, message } => {
                if get(field).chars().count() < min {
                    return Err(message.to_string());
                }
            }
            Rule::HasUppercase { field, message } => {
                if !get(field).chars().any(char::is_uppercase) {
                    return Err(message.to_string());
                }
            }
            Rule::SameAs { field, other, message } => {
                if get(field) != get(other) {
                    return Err(message.to_string());
                }
            }
            Rule::FiniteNumber { field, message } => {
                if parse_number(get(field)).is_none() {
                    return Err(message.to_string());
                }
            }
            Rule::CalendarDate { field, message } => {
                if parse_calendar_date(get(field)).is_none() {
                    return Err(message.to_string());
                }
            }
        }
        Ok(())
    }
}

/// Run `rules` in order and return the first violation
pub fn first_violation(rules: &[Rule], fields: &Fields) -> Result<(), String> {
    rules.iter().try_for_each(|rule| rule.check(fields))
}

/// Validate an email address against the format regex
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() || !EMAIL_REGEX.is_match(email) {
        return Err("Invalid Email Format!".to_string());
    }
    Ok(())
}

/// Parse a finite number; rejects NaN and infinities
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into its calendar date
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    parse_datetime(s).map(|dt| dt.date_naive())
}

/// Split comma-separated skills, trimming each and dropping empties
pub fn split_skills(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_validate_email_accepts() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("test@chebebtn.com").is_ok());
    }

    #[test]
    fn test_validate_email_rejects() {
        assert!(validate_email("").is_err());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("no-at.example.com").is_err());
        assert!(validate_email("a@bcom").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@@b.com").is_err());
        assert!(validate_email(" a@b.com").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("50000"), Some(50000.0));
        assert_eq!(parse_number(" 1234.5 "), Some(1234.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_parse_calendar_date() {
        assert!(parse_calendar_date("2025-08-31").is_some());
        assert!(parse_calendar_date("2025-08-31T00:00:00.000Z").is_some());
        assert!(parse_calendar_date("2025-02-30").is_none());
        assert!(parse_calendar_date("31/08/2025").is_none());
        assert!(parse_calendar_date("soon").is_none());
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(split_skills("Go, Rust, , TypeScript"), vec!["Go", "Rust", "TypeScript"]);
        assert!(split_skills("").is_empty());
        assert!(split_skills(" , ,").is_empty());
    }

    #[test]
    fn test_first_violation_stops_at_first_rule() {
        let rules = [
            Rule::AllPresent {
                fields: &["a", "b"],
                message: "fill all",
            },
            Rule::Email { field: "a" },
        ];
        let f = fields(&[("a", "nope"), ("b", "")]);
        assert_eq!(first_violation(&rules, &f), Err("fill all".to_string()));

        let f = fields(&[("a", "nope"), ("b", "x")]);
        assert_eq!(first_violation(&rules, &f), Err("Invalid Email Format!".to_string()));
    }

    #[test]
    fn test_each_present_names_first_missing_field() {
        let rule = Rule::EachPresent {
            fields: &["title", "company"],
        };
        let f = fields(&[("title", ""), ("company", "")]);
        assert_eq!(rule.check(&f), Err("The title is required to fill!".to_string()));
    }

    #[test]
    fn test_missing_key_counts_as_empty() {
        let rule = Rule::AllPresent {
            fields: &["x"],
            message: "fill all",
        };
        assert!(rule.check(&Fields::new()).is_err());
    }
}
