use tracing::{info, warn};

use super::PageResult;
use crate::constants::{CONFIRMATION_FEEDBACK_LINK, UPDATE_SUBMITTED_PAGE_TITLE};
use crate::date::today_readable;
use crate::session::Session;
use crate::view::ViewData;

/// Confirmation page shown once the change has been submitted. `Err` means
/// nothing was submitted in this session.
pub fn update_submitted_view(session: &Session, user_email: Option<String>) -> PageResult {
    info!("GET request to serve update submitted page");

    let extra = session.extra();
    let mut view_data = ViewData {
        title: Some(UPDATE_SUBMITTED_PAGE_TITLE.to_string()),
        user_email,
        signout_banner: true,
        feedback_link: Some(CONFIRMATION_FEEDBACK_LINK.to_string()),
        ..ViewData::default()
    };

    let Some(updated) = extra.updated_company_email.clone() else {
        warn!("update submitted page requested before a submission");
        return Err(view_data);
    };

    view_data.updated_company_email = Some(updated);
    view_data.submission_id = extra.submitted_reference.clone();
    view_data.submitted_date = Some(today_readable());
    if let Some(profile) = &extra.company_profile {
        view_data.company_name = Some(profile.company_name.to_uppercase());
        view_data.company_number = Some(profile.company_number.clone());
    }
    Ok(view_data)
}
