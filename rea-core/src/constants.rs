// Session keys under `extra_data`
pub const COMPANY_NUMBER: &str = "companyNumber";
pub const COMPANY_PROFILE: &str = "companyProfile";
pub const REGISTERED_EMAIL_ADDRESS: &str = "registeredEmailAddress";
pub const SUBMISSION_ID: &str = "submissionId";
pub const NEW_EMAIL_ADDRESS: &str = "newEmailAddress";
pub const UPDATED_COMPANY_EMAIL: &str = "updatedCompanyEmail";
pub const SIGN_OUT_RETURN_PAGE: &str = "signOutReturnPage";

// Transaction record
pub const DESCRIPTION: &str = "Update Registered Email Address Transaction";
pub const REFERENCE: &str = "UpdateRegisteredEmailAddressReference_";

// Form fields and the anchors the error summary links to
pub const UPDATE_EMAIL_ERROR_KEY: &str = "changeEmailAddress";
pub const UPDATE_EMAIL_ERROR_ANCHOR: &str = "#changeEmailAddress";
pub const COMPANY_NUMBER_ERROR_KEY: &str = "companyNumber";
pub const COMPANY_NUMBER_ERROR_ANCHOR: &str = "#companyNumber";
pub const SIGN_OUT_ERROR_KEY: &str = "signout";
pub const SIGN_OUT_ERROR_ANCHOR: &str = "#signout";

// Page titles
pub const SERVICE_NAME: &str = "Update a registered email address";
pub const CHANGE_EMAIL_PAGE_TITLE: &str = "What is the new registered email address?";
pub const CHECK_ANSWER_PAGE_TITLE: &str = "Check your answer";
pub const COMPANY_NUMBER_PAGE_TITLE: &str = "What is the company number?";
pub const COMPANY_CONFIRM_PAGE_TITLE: &str = "Confirm this is the correct company";
pub const COMPANY_INVALID_PAGE_TITLE: &str = "You cannot use this service";
pub const UPDATE_SUBMITTED_PAGE_TITLE: &str = "Registered email address update submitted";
pub const SIGN_OUT_PAGE_TITLE: &str = "Are you sure you want to sign out?";
pub const ERROR_TITLE_PREFIX: &str = "Error: ";

// Error messages
pub const NO_EMAIL_ADDRESS_FOUND: &str = "No registered email address found for this company";
pub const NO_EMAIL_ADDRESS_SUPPLIED: &str = "Enter the new registered email address";
pub const EMAIL_ADDRESS_INVALID: &str =
    "Enter an email address in the correct format, like name@example.com";
pub const EMAIL_ADDRESS_TOO_LONG: &str = "Email address must be 256 characters or less";
pub const TRANSACTION_CREATE_ERROR: &str = "Unable to create the transaction record for company ";
pub const TRANSACTION_CLOSE_ERROR: &str = "Unable to close the transaction record for company ";
pub const STATEMENT_NOT_ACCEPTED: &str =
    "You need to accept the registered email address statement";
pub const NO_COMPANY_NUMBER_SUPPLIED: &str = "Enter a company number";
pub const INVALID_COMPANY_NUMBER: &str = "Enter a valid company number";
pub const COMPANY_NUMBER_NOT_FOUND: &str = "Company number not found";
pub const NO_COMPANY_PROFILE_FOUND: &str = "Company details could not be found, search again";
pub const SIGN_OUT_NOT_SELECTED: &str = "Select yes if you want to sign out";

pub const MAX_EMAIL_LENGTH: usize = 256;
pub const COMPANY_NUMBER_LENGTH: usize = 8;

// Feedback surveys linked from the page footer and the confirmation page
pub const FEEDBACK_LINK: &str = "https://www.smartsurvey.co.uk/s/update-reg-email-addr-fdbck/";
pub const CONFIRMATION_FEEDBACK_LINK: &str =
    "https://www.smartsurvey.co.uk/s/update-reg-email-addr-conf/";
