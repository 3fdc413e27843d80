use std::collections::BTreeMap;

use serde::Serialize;

/// One entry in the page-level error summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummaryItem {
    pub href: String,
    pub text: String,
}

/// Field errors keyed by form field name, plus the summary list that links to
/// each field's anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
    #[serde(rename = "errorList")]
    error_list: Vec<ErrorSummaryItem>,
}

impl ValidationErrors {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, anchor: &str, message: impl Into<String>) {
        let message = message.into();
        self.error_list.push(ErrorSummaryItem {
            href: anchor.to_string(),
            text: message.clone(),
        });
        self.fields.insert(key.to_string(), message);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single-field error set, the shape every page in this flow uses.
pub fn format_validation_error(key: &str, anchor: &str, message: impl Into<String>) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.insert(key, anchor, message);
    errors
}

/// Data handed to the renderer for one page response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub signout_banner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub company_address: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_company_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_link: Option<String>,
}

impl ViewData {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
            || self.statement_error.is_some()
    }

    /// The message recorded against `key`, if any.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.as_ref()?.get(key)
    }
}
