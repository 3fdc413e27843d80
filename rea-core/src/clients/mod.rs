//! Remote services the email change flow talks to. The workflow only sees the
//! traits; [`ChsApiClient`] is the production implementation of all three.

mod chs;

pub use chs::{ChsApiClient, ChsApiClientConfig};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiResource, CompanyProfile, RegisteredEmailAddress, Transaction};
use crate::session::Session;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CompanyProfileClient: Send + Sync {
    async fn get_company_profile(&self, company_number: &str) -> Result<ApiResource<CompanyProfile>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EmailRegistryClient: Send + Sync {
    /// Error statuses are passed through in the returned resource rather than
    /// raised; only transport failures are `Err`.
    async fn get_company_email(
        &self,
        company_number: &str,
    ) -> Result<ApiResource<RegisteredEmailAddress>>;
}

/// Lifecycle of the transaction record that represents one change request.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TransactionClient: Send + Sync {
    async fn post_transaction(
        &self,
        session: &Session,
        company_number: &str,
        description: &str,
        reference: &str,
    ) -> Result<Transaction>;

    async fn create_registered_email_address_resource(
        &self,
        session: &Session,
        transaction_id: &str,
        email: &str,
    ) -> Result<()>;

    async fn close_transaction(
        &self,
        session: &Session,
        company_number: &str,
        transaction_id: &str,
    ) -> Result<()>;
}
