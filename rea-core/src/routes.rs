macro_rules! rea_path {
    ($path:literal) => {
        concat!("/registered-email-address", $path)
    };
}

pub const HEALTHCHECK: &str = "/healthcheck";
pub const HOME: &str = rea_path!("");
pub const SIGN_OUT: &str = rea_path!("/signout");
pub const ACCESSIBILITY_STATEMENT: &str = rea_path!("/accessibility-statement");
pub const THERE_IS_A_PROBLEM: &str = rea_path!("/there-is-a-problem");

/// Where the browser lands when the session has no signed-in user.
pub const SIGN_IN: &str = "/signin";

pub mod company {
    pub const NUMBER: &str = rea_path!("/company/number");
    pub const CONFIRM: &str = rea_path!("/company/confirm");
    pub const INVALID: &str = rea_path!("/company/invalid");
}

pub mod email {
    pub const CHANGE_EMAIL_ADDRESS: &str = rea_path!("/email/change-email-address");
    pub const CHECK_ANSWER: &str = rea_path!("/email/check-your-answer");
    pub const UPDATE_SUBMITTED: &str = rea_path!("/email/update-submitted");
}

/// Template names, relative to the renderer's template root.
pub mod views {
    pub const HOME: &str = "index/home.html";
    pub const SIGN_OUT: &str = "index/signout.html";
    pub const ACCESSIBILITY_STATEMENT: &str = "index/accessibility-statement.html";
    pub const THERE_IS_A_PROBLEM: &str = "index/there-is-a-problem.html";
    pub const COMPANY_NUMBER: &str = "company/number.html";
    pub const COMPANY_CONFIRM: &str = "company/confirm.html";
    pub const COMPANY_INVALID: &str = "company/invalid.html";
    pub const CHANGE_EMAIL_ADDRESS: &str = "email/change-email-address.html";
    pub const CHECK_ANSWER: &str = "email/check-your-answer.html";
    pub const UPDATE_SUBMITTED: &str = "email/update-submitted.html";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_service_prefix() {
        assert_eq!(HOME, "/registered-email-address");
        assert_eq!(company::CONFIRM, "/registered-email-address/company/confirm");
        assert_eq!(
            email::CHANGE_EMAIL_ADDRESS,
            "/registered-email-address/email/change-email-address"
        );
    }
}
