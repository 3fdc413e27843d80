use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::PageResult;
use super::transaction::create_transaction;
use crate::clients::TransactionClient;
use crate::constants::{
    CHANGE_EMAIL_PAGE_TITLE, EMAIL_ADDRESS_INVALID, ERROR_TITLE_PREFIX, NO_EMAIL_ADDRESS_FOUND,
    NO_EMAIL_ADDRESS_SUPPLIED, TRANSACTION_CREATE_ERROR, UPDATE_EMAIL_ERROR_ANCHOR,
    UPDATE_EMAIL_ERROR_KEY,
};
use crate::routes;
use crate::session::Session;
use crate::validation::{CHANGE_EMAIL_ADDRESS_SCHEMA, FormValidator, validate_email_string};
use crate::view::{ViewData, format_validation_error};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeEmailForm {
    #[serde(rename = "changeEmailAddress", default)]
    pub change_email_address: Option<String>,
}

impl ChangeEmailForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            change_email_address: Some(email.into()),
        }
    }
}

/// The "what is the new registered email address" page.
pub struct ChangeEmailAddressHandler<'a> {
    validator: FormValidator,
    transactions: &'a dyn TransactionClient,
    view_data: ViewData,
}

impl fmt::Debug for ChangeEmailAddressHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEmailAddressHandler")
            .field("view_data", &self.view_data)
            .finish_non_exhaustive()
    }
}

impl<'a> ChangeEmailAddressHandler<'a> {
    pub fn new(
        validator: FormValidator,
        transactions: &'a dyn TransactionClient,
        user_email: Option<String>,
    ) -> Self {
        let mut view_data = ViewData {
            back_uri: Some(routes::company::CONFIRM.to_string()),
            signout_banner: true,
            ..ViewData::default()
        };
        if let Some(user_email) = user_email {
            view_data.user_email = Some(user_email);
            view_data.title = Some(CHANGE_EMAIL_PAGE_TITLE.to_string());
        }

        Self {
            validator,
            transactions,
            view_data,
        }
    }

    /// Requires the confirmed company, its profile and its current address in
    /// session, then opens a transaction and records its id as the submission id.
    pub async fn get(mut self, session: &mut Session) -> PageResult {
        info!("GET request to serve change registered email address page");

        let extra = session.extra();
        let (Some(company_number), Some(company_email), Some(profile)) = (
            extra.company_number.clone(),
            extra.registered_email_address.clone(),
            extra.company_profile.clone(),
        ) else {
            info!("company confirm - company email not found");
            return Err(self.reject(NO_EMAIL_ADDRESS_FOUND));
        };

        self.view_data.company_email_address = Some(company_email);
        self.view_data.company_name = Some(profile.company_name.to_uppercase());
        self.view_data.company_number = Some(profile.company_number);
        self.view_data.new_email_address = extra.new_email_address.clone();

        match create_transaction(self.transactions, session, &company_number).await {
            Ok(transaction_id) => {
                session.extra_mut().submission_id = Some(transaction_id);
                Ok(self.view_data)
            }
            Err(_) => {
                // An id left over from an earlier, closed submission must not be reused.
                session.extra_mut().submission_id = None;
                let message = format!("{TRANSACTION_CREATE_ERROR}{company_number}");
                error!("{message}");
                Err(self.reject(message))
            }
        }
    }

    /// Validates the submitted address (schema first, then syntax) and only
    /// then stores it as the pending new address.
    pub async fn post(mut self, session: &mut Session, form: &ChangeEmailForm) -> PageResult {
        info!("POST request to serve change registered email address page");

        let extra = session.extra();
        self.view_data.company_email_address = extra.registered_email_address.clone();
        if let Some(profile) = &extra.company_profile {
            self.view_data.company_name = Some(profile.company_name.to_uppercase());
            self.view_data.company_number = Some(profile.company_number.clone());
        }
        self.view_data.new_email_address = form.change_email_address.clone();

        if let Some(errors) = self.validator.validate(form, &CHANGE_EMAIL_ADDRESS_SCHEMA) {
            let message = errors
                .get(UPDATE_EMAIL_ERROR_KEY)
                .cloned()
                .unwrap_or_else(|| NO_EMAIL_ADDRESS_SUPPLIED.to_string());
            return Err(self.reject_input(message));
        }

        let email = form
            .change_email_address
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if !validate_email_string(email) {
            return Err(self.reject_input(EMAIL_ADDRESS_INVALID));
        }

        session.extra_mut().new_email_address = Some(email.to_string());
        Ok(self.view_data)
    }

    fn reject(mut self, message: impl Into<String>) -> ViewData {
        self.view_data.errors = Some(format_validation_error(
            UPDATE_EMAIL_ERROR_KEY,
            UPDATE_EMAIL_ERROR_ANCHOR,
            message,
        ));
        self.view_data
    }

    fn reject_input(mut self, message: impl Into<String>) -> ViewData {
        self.view_data.title = Some(format!("{ERROR_TITLE_PREFIX}{CHANGE_EMAIL_PAGE_TITLE}"));
        self.reject(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockTransactionClient;
    use crate::error::ServiceError;
    use crate::models::{CompanyProfile, Transaction, TransactionStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const COMPANY_NO: &str = "01234567";
    const TEST_EMAIL_EXISTING: &str = "test@test.co.biz";
    const TEST_EMAIL_UPDATE: &str = "new_test@test.co.biz";
    const INVALID_EMAIL_ADDRESS: &str = "test-test.co.biz";
    const BACK_LINK_PATH: &str = "/registered-email-address/company/confirm";

    fn profile() -> CompanyProfile {
        CompanyProfile {
            company_number: COMPANY_NO.into(),
            company_name: "Test Company Ltd".into(),
            company_status: Some("active".into()),
            company_type: None,
            date_of_creation: None,
            registered_office_address: None,
        }
    }

    fn populated_session() -> Session {
        let mut session = Session::with_id("session");
        let extra = session.extra_mut();
        extra.company_number = Some(COMPANY_NO.into());
        extra.registered_email_address = Some(TEST_EMAIL_EXISTING.into());
        extra.company_profile = Some(profile());
        session
    }

    fn open_transaction(id: String) -> Transaction {
        Transaction {
            id,
            company_number: Some(COMPANY_NO.into()),
            description: None,
            reference: None,
            status: TransactionStatus::Open,
        }
    }

    fn handler(transactions: &MockTransactionClient) -> ChangeEmailAddressHandler<'_> {
        ChangeEmailAddressHandler::new(
            FormValidator::new(),
            transactions,
            Some(TEST_EMAIL_EXISTING.to_string()),
        )
    }

    #[tokio::test]
    async fn test_get_with_populated_session_opens_one_transaction() {
        let mut transactions = MockTransactionClient::new();
        transactions
            .expect_post_transaction()
            .times(1)
            .returning(|_, _, _, _| Ok(open_transaction("txn-1".into())));
        let mut session = populated_session();

        let view_data = handler(&transactions).get(&mut session).await.unwrap();

        assert_eq!(session.extra().submission_id.as_deref(), Some("txn-1"));
        assert_eq!(view_data.company_email_address.as_deref(), Some(TEST_EMAIL_EXISTING));
        assert_eq!(view_data.company_name.as_deref(), Some("TEST COMPANY LTD"));
        assert_eq!(view_data.back_uri.as_deref(), Some(BACK_LINK_PATH));
        assert_eq!(view_data.user_email.as_deref(), Some(TEST_EMAIL_EXISTING));
        assert_eq!(view_data.title.as_deref(), Some(CHANGE_EMAIL_PAGE_TITLE));
        assert!(!view_data.has_errors());
    }

    #[tokio::test]
    async fn test_get_missing_session_state_never_opens_transaction() {
        let clears: [fn(&mut Session); 3] = [
            |s| s.extra_mut().company_number = None,
            |s| s.extra_mut().registered_email_address = None,
            |s| s.extra_mut().company_profile = None,
        ];

        for clear in clears {
            let mut transactions = MockTransactionClient::new();
            transactions.expect_post_transaction().times(0);
            let mut session = populated_session();
            clear(&mut session);

            let view_data = handler(&transactions).get(&mut session).await.unwrap_err();

            assert_eq!(view_data.error(UPDATE_EMAIL_ERROR_KEY), Some(NO_EMAIL_ADDRESS_FOUND));
            assert!(session.extra().submission_id.is_none());
        }
    }

    #[tokio::test]
    async fn test_get_transaction_create_failure_is_rejected() {
        let mut transactions = MockTransactionClient::new();
        transactions
            .expect_post_transaction()
            .times(1)
            .returning(|_, _, _, _| Err(ServiceError::Internal("down".into())));
        let mut session = populated_session();

        let view_data = handler(&transactions).get(&mut session).await.unwrap_err();

        assert_eq!(
            view_data.error(UPDATE_EMAIL_ERROR_KEY),
            Some(format!("{TRANSACTION_CREATE_ERROR}{COMPANY_NO}").as_str())
        );
        assert!(session.extra().submission_id.is_none());
    }

    #[tokio::test]
    async fn test_get_create_failure_drops_stale_submission_id() {
        let mut transactions = MockTransactionClient::new();
        transactions
            .expect_post_transaction()
            .times(1)
            .returning(|_, _, _, _| Err(ServiceError::Internal("down".into())));
        let mut session = populated_session();
        session.extra_mut().submission_id = Some("txn-already-closed".into());

        assert!(handler(&transactions).get(&mut session).await.is_err());
        assert!(session.extra().submission_id.is_none());
    }

    #[tokio::test]
    async fn test_get_twice_opens_two_transactions_last_wins() {
        let counter = AtomicUsize::new(0);
        let mut transactions = MockTransactionClient::new();
        transactions
            .expect_post_transaction()
            .times(2)
            .returning(move |_, _, _, _| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(open_transaction(format!("txn-{n}")))
            });
        let mut session = populated_session();

        handler(&transactions).get(&mut session).await.unwrap();
        let first = session.extra().submission_id.clone();
        handler(&transactions).get(&mut session).await.unwrap();
        let second = session.extra().submission_id.clone();

        assert_eq!(first.as_deref(), Some("txn-1"));
        assert_eq!(second.as_deref(), Some("txn-2"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_post_empty_email_reports_schema_error() {
        let transactions = MockTransactionClient::new();
        let mut session = Session::with_id("session");

        let view_data = handler(&transactions)
            .post(&mut session, &ChangeEmailForm::new(""))
            .await
            .unwrap_err();

        assert_eq!(view_data.back_uri.as_deref(), Some(BACK_LINK_PATH));
        assert_eq!(view_data.error(UPDATE_EMAIL_ERROR_KEY), Some(NO_EMAIL_ADDRESS_SUPPLIED));
        assert!(session.extra().new_email_address.is_none());
    }

    #[tokio::test]
    async fn test_post_missing_field_reports_schema_error() {
        let transactions = MockTransactionClient::new();
        let mut session = Session::with_id("session");

        let view_data = handler(&transactions)
            .post(&mut session, &ChangeEmailForm::default())
            .await
            .unwrap_err();

        assert_eq!(view_data.error(UPDATE_EMAIL_ERROR_KEY), Some(NO_EMAIL_ADDRESS_SUPPLIED));
    }

    #[tokio::test]
    async fn test_post_malformed_email_reports_invalid() {
        let transactions = MockTransactionClient::new();
        let mut session = Session::with_id("session");

        let view_data = handler(&transactions)
            .post(&mut session, &ChangeEmailForm::new(INVALID_EMAIL_ADDRESS))
            .await
            .unwrap_err();

        assert_eq!(view_data.back_uri.as_deref(), Some(BACK_LINK_PATH));
        assert_eq!(view_data.error(UPDATE_EMAIL_ERROR_KEY), Some(EMAIL_ADDRESS_INVALID));
        assert_eq!(
            view_data.title.as_deref(),
            Some(format!("Error: {CHANGE_EMAIL_PAGE_TITLE}").as_str())
        );
        assert!(session.extra().new_email_address.is_none());
    }

    #[tokio::test]
    async fn test_post_valid_email_is_stored() {
        let transactions = MockTransactionClient::new();
        let mut session = Session::with_id("session");

        let view_data = handler(&transactions)
            .post(&mut session, &ChangeEmailForm::new(TEST_EMAIL_UPDATE))
            .await
            .unwrap();

        assert!(view_data.errors.is_none());
        assert_eq!(view_data.back_uri.as_deref(), Some(BACK_LINK_PATH));
        assert_eq!(view_data.user_email.as_deref(), Some(TEST_EMAIL_EXISTING));
        assert_eq!(view_data.title.as_deref(), Some(CHANGE_EMAIL_PAGE_TITLE));
        assert!(view_data.signout_banner);
        assert_eq!(session.extra().new_email_address.as_deref(), Some(TEST_EMAIL_UPDATE));
    }
}
