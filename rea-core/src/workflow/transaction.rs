use reqwest::StatusCode;
use serde::Serialize;
use tracing::{error, warn};

use crate::clients::TransactionClient;
use crate::constants::{DESCRIPTION, REFERENCE};
use crate::error::{Result, ServiceError};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
}

/// Opens the transaction that tracks this change request and returns its id.
///
/// One attempt only. Any failure is logged and reported as a bare internal
/// error; the caller decides what the user sees.
pub async fn create_transaction(
    transactions: &dyn TransactionClient,
    session: &Session,
    company_number: &str,
) -> Result<String> {
    match transactions
        .post_transaction(session, company_number, DESCRIPTION, REFERENCE)
        .await
    {
        Ok(transaction) => Ok(transaction.id),
        Err(err) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
            error!(
                error = %err,
                "update registered email address: {status} - error while create transaction record for {company_number}"
            );
            Err(ServiceError::Internal(status.to_string()))
        }
    }
}

/// Attaches the new address to the open transaction, then closes it.
///
/// A failed attach does not stop the close attempt and is not rolled back if
/// the close then fails.
pub async fn submit_email_change(
    transactions: &dyn TransactionClient,
    session: &Session,
    company_number: &str,
    transaction_id: &str,
    email: &str,
) -> Result<SubmissionStatus> {
    if let Err(err) = transactions
        .create_registered_email_address_resource(session, transaction_id, email)
        .await
    {
        warn!(
            company_number,
            transaction_id,
            error = %err,
            "registered email address resource not attached, closing transaction anyway"
        );
    }

    transactions
        .close_transaction(session, company_number, transaction_id)
        .await
        .inspect_err(|err| {
            error!(company_number, transaction_id, error = %err, "transaction close failed");
        })?;

    Ok(SubmissionStatus::Success)
}
