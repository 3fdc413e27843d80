use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info};
use url::Url;

use super::{CompanyProfileClient, EmailRegistryClient, TransactionClient};
use crate::error::{Result, ServiceError};
use crate::models::{
    ApiResource, CompanyProfile, CompanyProfileResource, RegisteredEmailAddress,
    RegisteredEmailAddressResource, Transaction, TransactionRequest, TransactionStatus,
};
use crate::session::Session;

#[derive(Clone)]
pub struct ChsApiClientConfig {
    /// Public API: company profiles and transactions.
    pub api_url: String,
    /// Query API that fronts the registered email address store.
    pub oracle_query_api_url: String,
    pub api_key: String,
}

impl fmt::Debug for ChsApiClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChsApiClientConfig")
            .field("api_url", &self.api_url)
            .field("oracle_query_api_url", &self.oracle_query_api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// `reqwest` client for the Companies House APIs used by this service.
#[derive(Clone)]
pub struct ChsApiClient {
    http: Client,
    api_url: String,
    oracle_query_api_url: String,
    api_key: String,
}

impl fmt::Debug for ChsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChsApiClient")
            .field("api_url", &self.api_url)
            .field("oracle_query_api_url", &self.oracle_query_api_url)
            .finish_non_exhaustive()
    }
}

impl ChsApiClient {
    pub fn new(config: ChsApiClientConfig) -> Result<Self> {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: ChsApiClientConfig) -> Result<Self> {
        // Reject malformed base URLs at startup rather than on first request.
        Url::parse(&config.api_url)?;
        Url::parse(&config.oracle_query_api_url)?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            oracle_query_api_url: config.oracle_query_api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, &self.api_key)
    }

    fn with_user_token(&self, request: RequestBuilder, session: &Session) -> Result<RequestBuilder> {
        let token = session.access_token().ok_or(ServiceError::NotSignedIn)?;
        Ok(request.bearer_auth(token))
    }

    /// GETs a resource, passing error statuses back as data.
    async fn get_resource<R, T>(&self, url: String) -> Result<ApiResource<T>>
    where
        R: DeserializeOwned + Into<T>,
    {
        debug!(%url, "GET");
        let response = self.with_api_key(self.http.get(&url)).send().await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            return Ok(ApiResource::status_only(status.as_u16()));
        }

        let body: R = response.json().await?;
        Ok(ApiResource::with_resource(status.as_u16(), body.into()))
    }
}

fn ensure_success(operation: &'static str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ServiceError::UnexpectedStatus {
            operation,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl CompanyProfileClient for ChsApiClient {
    async fn get_company_profile(&self, company_number: &str) -> Result<ApiResource<CompanyProfile>> {
        info!(company_number, "Looking up company profile");
        self.get_resource::<CompanyProfileResource, _>(format!(
            "{}/company/{}",
            self.api_url, company_number
        ))
        .await
    }
}

#[async_trait]
impl EmailRegistryClient for ChsApiClient {
    async fn get_company_email(
        &self,
        company_number: &str,
    ) -> Result<ApiResource<RegisteredEmailAddress>> {
        info!(company_number, "Looking up registered email address");
        self.get_resource::<RegisteredEmailAddressResource, _>(format!(
            "{}/company/{}/registered-email-address",
            self.oracle_query_api_url, company_number
        ))
        .await
    }
}

#[async_trait]
impl TransactionClient for ChsApiClient {
    async fn post_transaction(
        &self,
        session: &Session,
        company_number: &str,
        description: &str,
        reference: &str,
    ) -> Result<Transaction> {
        let body = TransactionRequest {
            company_number,
            description,
            reference,
        };
        let request = self.http.post(format!("{}/transactions", self.api_url)).json(&body);
        let response = self.with_user_token(request, session)?.send().await?;

        ensure_success("create transaction", response.status())?;
        let transaction: Transaction = response.json().await?;
        info!(company_number, transaction_id = %transaction.id, "Created transaction");
        Ok(transaction)
    }

    async fn create_registered_email_address_resource(
        &self,
        session: &Session,
        transaction_id: &str,
        email: &str,
    ) -> Result<()> {
        let request = self
            .http
            .post(format!(
                "{}/transactions/{}/registered-email-address",
                self.api_url, transaction_id
            ))
            .json(&json!({ "registered_email_address": email }));
        let response = self.with_user_token(request, session)?.send().await?;

        ensure_success("create registered email address resource", response.status())
            .inspect_err(|err| error!(transaction_id, error = %err, "email resource not attached"))
    }

    async fn close_transaction(
        &self,
        session: &Session,
        company_number: &str,
        transaction_id: &str,
    ) -> Result<()> {
        let request = self
            .http
            .put(format!("{}/transactions/{}", self.api_url, transaction_id))
            .json(&json!({ "status": TransactionStatus::Closed }));
        let response = self.with_user_token(request, session)?.send().await?;

        ensure_success("close transaction", response.status())?;
        info!(company_number, transaction_id, "Closed transaction");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AccessToken, SignInInfo};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMPANY_NO: &str = "01234567";

    fn client_for(server: &MockServer) -> ChsApiClient {
        ChsApiClient::new(ChsApiClientConfig {
            api_url: server.uri(),
            oracle_query_api_url: server.uri(),
            api_key: "test-api-key".into(),
        })
        .unwrap()
    }

    fn signed_in_session() -> Session {
        let mut session = Session::with_id("session");
        session.data.signin_info = Some(SignInInfo {
            signed_in: 1,
            access_token: Some(AccessToken {
                access_token: "oauth-token".into(),
            }),
            ..Default::default()
        });
        session
    }

    #[tokio::test]
    async fn test_get_company_email_unwraps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/company/{COMPANY_NO}/registered-email-address")))
            .and(header("authorization", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "registered_email_address": "test@test.co.biz" }),
            ))
            .mount(&server)
            .await;

        let resource = client_for(&server).get_company_email(COMPANY_NO).await.unwrap();

        assert_eq!(resource.http_status_code, 200);
        assert_eq!(
            resource.resource,
            Some(RegisteredEmailAddress {
                company_email: "test@test.co.biz".into()
            })
        );
    }

    #[tokio::test]
    async fn test_get_company_email_passes_error_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/company/{COMPANY_NO}/registered-email-address")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = client_for(&server).get_company_email(COMPANY_NO).await.unwrap();

        assert_eq!(resource.http_status_code, 404);
        assert!(resource.resource.is_none());
    }

    #[tokio::test]
    async fn test_get_company_profile_maps_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/company/{COMPANY_NO}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "company_number": COMPANY_NO,
                "company_name": "Test Company Ltd",
                "company_status": "active"
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server)
            .get_company_profile(COMPANY_NO)
            .await
            .unwrap()
            .into_resource()
            .unwrap();

        assert_eq!(profile.company_name, "Test Company Ltd");
        assert_eq!(profile.company_status.as_deref(), Some("active"));
    }

    #[tokio::test]
    async fn test_post_transaction_sends_description_and_reference() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .and(header("authorization", "Bearer oauth-token"))
            .and(body_json(json!({
                "company_number": COMPANY_NO,
                "description": "desc",
                "reference": "ref"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "178417-909116-690426",
                "status": "open"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transaction = client_for(&server)
            .post_transaction(&signed_in_session(), COMPANY_NO, "desc", "ref")
            .await
            .unwrap();

        assert_eq!(transaction.id, "178417-909116-690426");
        assert_eq!(transaction.status, TransactionStatus::Open);
    }

    #[tokio::test]
    async fn test_post_transaction_requires_user_token() {
        let server = MockServer::start().await;

        let err = client_for(&server)
            .post_transaction(&Session::with_id("anonymous"), COMPANY_NO, "desc", "ref")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_attach_and_close_request_shapes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactions/txn-1/registered-email-address"))
            .and(body_json(json!({ "registered_email_address": "new_test@test.co.biz" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/transactions/txn-1"))
            .and(body_json(json!({ "status": "closed" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = signed_in_session();
        client
            .create_registered_email_address_resource(&session, "txn-1", "new_test@test.co.biz")
            .await
            .unwrap();
        client
            .close_transaction(&session, COMPANY_NO, "txn-1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_transaction_failure_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/transactions/txn-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .close_transaction(&signed_in_session(), COMPANY_NO, "txn-1")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::UnexpectedStatus {
                operation: "close transaction",
                status: 500
            }
        ));
    }
}
