//! Pages that only need a title and the signed-in user.

use crate::constants::{REFERENCE, SERVICE_NAME};
use crate::view::ViewData;

pub fn home_view(user_email: Option<String>) -> ViewData {
    ViewData {
        title: Some(SERVICE_NAME.to_string()),
        user_email,
        ..ViewData::default()
    }
}

pub fn accessibility_statement_view(user_email: Option<String>) -> ViewData {
    ViewData {
        title: Some(format!("Accessibility statement - {SERVICE_NAME}")),
        user_email,
        ..ViewData::default()
    }
}

pub fn there_is_a_problem_view() -> ViewData {
    ViewData::titled(&format!("Service offline - {REFERENCE} - GOV.UK"))
}
