use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::constants::{
    COMPANY_NUMBER_ERROR_KEY, COMPANY_NUMBER_LENGTH, EMAIL_ADDRESS_TOO_LONG, MAX_EMAIL_LENGTH,
    NO_COMPANY_NUMBER_SUPPLIED, NO_EMAIL_ADDRESS_SUPPLIED, UPDATE_EMAIL_ERROR_KEY,
};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email regex should compile")
});

static COMPANY_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{8}$").expect("company number regex should compile"));

/// Field name to message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub required_message: &'static str,
    pub max_length: Option<(usize, &'static str)>,
}

/// Declarative description of the fields a form must carry.
#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    pub rules: &'static [FieldRule],
}

pub const CHANGE_EMAIL_ADDRESS_SCHEMA: FormSchema = FormSchema {
    rules: &[FieldRule {
        field: UPDATE_EMAIL_ERROR_KEY,
        required_message: NO_EMAIL_ADDRESS_SUPPLIED,
        max_length: Some((MAX_EMAIL_LENGTH, EMAIL_ADDRESS_TOO_LONG)),
    }],
};

pub const COMPANY_NUMBER_SCHEMA: FormSchema = FormSchema {
    rules: &[FieldRule {
        field: COMPANY_NUMBER_ERROR_KEY,
        required_message: NO_COMPANY_NUMBER_SUPPLIED,
        max_length: None,
    }],
};

/// Checks a submitted form against a [`FormSchema`]. Only the first failing
/// rule per field is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator;

impl FormValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate<F: Serialize>(&self, form: &F, schema: &FormSchema) -> Option<FieldErrors> {
        let body = serde_json::to_value(form).unwrap_or(Value::Null);
        let mut errors = FieldErrors::new();

        for rule in schema.rules {
            let value = body
                .get(rule.field)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();

            if value.is_empty() {
                errors.insert(rule.field.to_string(), rule.required_message.to_string());
                continue;
            }

            if let Some((max, message)) = rule.max_length
                && value.chars().count() > max
            {
                errors.insert(rule.field.to_string(), message.to_string());
            }
        }

        (!errors.is_empty()).then_some(errors)
    }
}

pub fn validate_email_string(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Normalises user input into the canonical 8 character form: whitespace
/// removed, upper-cased, and the numeric tail left-padded with zeros.
pub fn sanitize_company_number(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if compact.is_empty() || compact.len() >= COMPANY_NUMBER_LENGTH {
        return compact;
    }

    let prefix_len = compact
        .chars()
        .take_while(|ch| ch.is_ascii_alphabetic())
        .count();
    let (prefix, digits) = compact.split_at(prefix_len);
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return compact;
    }

    let width = COMPANY_NUMBER_LENGTH - prefix.len();
    format!("{prefix}{digits:0>width$}")
}

pub fn is_valid_company_number(company_number: &str) -> bool {
    COMPANY_NUMBER_REGEX.is_match(company_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_reports_missing_and_empty_fields() {
        let validator = FormValidator::new();

        let errors = validator
            .validate(&json!({}), &CHANGE_EMAIL_ADDRESS_SCHEMA)
            .unwrap();
        assert_eq!(errors[UPDATE_EMAIL_ERROR_KEY], NO_EMAIL_ADDRESS_SUPPLIED);

        let errors = validator
            .validate(&json!({ "changeEmailAddress": "   " }), &CHANGE_EMAIL_ADDRESS_SCHEMA)
            .unwrap();
        assert_eq!(errors[UPDATE_EMAIL_ERROR_KEY], NO_EMAIL_ADDRESS_SUPPLIED);
    }

    #[test]
    fn test_schema_enforces_max_length() {
        let long = format!("{}@test.co.biz", "a".repeat(MAX_EMAIL_LENGTH));
        let errors = FormValidator::new()
            .validate(&json!({ "changeEmailAddress": long }), &CHANGE_EMAIL_ADDRESS_SCHEMA)
            .unwrap();
        assert_eq!(errors[UPDATE_EMAIL_ERROR_KEY], EMAIL_ADDRESS_TOO_LONG);
    }

    #[test]
    fn test_schema_passes_syntactically_bad_email() {
        // Syntax is a separate stage.
        let errors = FormValidator::new().validate(
            &json!({ "changeEmailAddress": "test-test.co.biz" }),
            &CHANGE_EMAIL_ADDRESS_SCHEMA,
        );
        assert!(errors.is_none());
    }

    #[test]
    fn test_validate_email_string() {
        assert!(validate_email_string("new_test@test.co.biz"));
        assert!(validate_email_string("first.last+tag@sub.example.org"));
        assert!(!validate_email_string("test-test.co.biz"));
        assert!(!validate_email_string("test@"));
        assert!(!validate_email_string("test@localhost"));
        assert!(!validate_email_string("two words@test.co.biz"));
        assert!(!validate_email_string(""));
    }

    #[test]
    fn test_sanitize_company_number() {
        assert_eq!(sanitize_company_number("1234567"), "01234567");
        assert_eq!(sanitize_company_number(" sc 1234 "), "SC001234");
        assert_eq!(sanitize_company_number("ni123456"), "NI123456");
        assert_eq!(sanitize_company_number("12345678"), "12345678");
        assert_eq!(sanitize_company_number("AB"), "AB");
        assert_eq!(sanitize_company_number(""), "");
    }

    #[test]
    fn test_is_valid_company_number() {
        assert!(is_valid_company_number("01234567"));
        assert!(is_valid_company_number("SC001234"));
        assert!(!is_valid_company_number("1234567"));
        assert!(!is_valid_company_number("AB"));
        assert!(!is_valid_company_number("0123456-"));
    }
}
