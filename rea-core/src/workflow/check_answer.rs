use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::PageResult;
use super::transaction::{SubmissionStatus, submit_email_change};
use crate::clients::TransactionClient;
use crate::constants::{
    CHECK_ANSWER_PAGE_TITLE, ERROR_TITLE_PREFIX, STATEMENT_NOT_ACCEPTED, TRANSACTION_CLOSE_ERROR,
};
use crate::routes;
use crate::session::Session;
use crate::view::ViewData;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckAnswerForm {
    #[serde(rename = "emailConfirmation", default)]
    pub email_confirmation: Option<String>,
}

impl CheckAnswerForm {
    pub fn confirmed() -> Self {
        Self {
            email_confirmation: Some("true".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// The statement checkbox was not ticked; re-render the form.
    StatementNotAccepted,
    /// No open transaction or pending address in session.
    MissingSubmission,
    TransactionClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckAnswerRejection {
    pub kind: RejectionKind,
    pub view_data: ViewData,
}

impl CheckAnswerRejection {
    /// Only an unticked statement is shown back on the form itself.
    pub fn is_form_error(&self) -> bool {
        self.kind == RejectionKind::StatementNotAccepted
    }
}

pub struct CheckAnswerHandler<'a> {
    transactions: &'a dyn TransactionClient,
    view_data: ViewData,
}

impl fmt::Debug for CheckAnswerHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckAnswerHandler")
            .field("view_data", &self.view_data)
            .finish_non_exhaustive()
    }
}

impl<'a> CheckAnswerHandler<'a> {
    pub fn new(transactions: &'a dyn TransactionClient, user_email: Option<String>) -> Self {
        let view_data = ViewData {
            title: Some(CHECK_ANSWER_PAGE_TITLE.to_string()),
            back_uri: Some(routes::email::CHANGE_EMAIL_ADDRESS.to_string()),
            user_email,
            signout_banner: true,
            ..ViewData::default()
        };

        Self {
            transactions,
            view_data,
        }
    }

    pub fn get(mut self, session: &Session) -> PageResult {
        info!("GET request to serve check your answer page");
        self.fill_from_session(session);

        if self.view_data.new_email_address.is_none() {
            return Err(self.view_data);
        }
        Ok(self.view_data)
    }

    /// Submits the pending address: attach it to the open transaction, then
    /// close the transaction. On success the pending address becomes the
    /// updated one.
    pub async fn post(
        mut self,
        session: &mut Session,
        form: &CheckAnswerForm,
    ) -> Result<SubmissionStatus, CheckAnswerRejection> {
        info!("POST request to submit registered email address change");
        self.fill_from_session(session);

        let accepted = form
            .email_confirmation
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty());
        if !accepted {
            self.view_data.title = Some(format!("{ERROR_TITLE_PREFIX}{CHECK_ANSWER_PAGE_TITLE}"));
            self.view_data.statement_error = Some(STATEMENT_NOT_ACCEPTED.to_string());
            return Err(self.reject(RejectionKind::StatementNotAccepted));
        }

        let extra = session.extra();
        let (Some(company_number), Some(transaction_id), Some(email)) = (
            extra.company_number.clone(),
            extra.submission_id.clone(),
            extra.new_email_address.clone(),
        ) else {
            error!("check answer submitted without an open transaction or a new email address");
            return Err(self.reject(RejectionKind::MissingSubmission));
        };

        match submit_email_change(
            self.transactions,
            session,
            &company_number,
            &transaction_id,
            &email,
        )
        .await
        {
            Ok(status) => {
                let extra = session.extra_mut();
                extra.updated_company_email = extra.new_email_address.take();
                extra.submitted_reference = extra.submission_id.take();
                Ok(status)
            }
            Err(_) => {
                self.view_data.statement_error =
                    Some(format!("{TRANSACTION_CLOSE_ERROR}{company_number}"));
                Err(self.reject(RejectionKind::TransactionClose))
            }
        }
    }

    fn fill_from_session(&mut self, session: &Session) {
        let extra = session.extra();
        self.view_data.new_email_address = extra.new_email_address.clone();
        self.view_data.company_email_address = extra.registered_email_address.clone();
        if let Some(profile) = &extra.company_profile {
            self.view_data.company_name = Some(profile.company_name.to_uppercase());
            self.view_data.company_number = Some(profile.company_number.clone());
        }
    }

    fn reject(self, kind: RejectionKind) -> CheckAnswerRejection {
        CheckAnswerRejection {
            kind,
            view_data: self.view_data,
        }
    }
}
