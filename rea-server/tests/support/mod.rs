#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use rea_core::clients::{MockCompanyProfileClient, MockEmailRegistryClient, MockTransactionClient};
use rea_core::models::CompanyProfile;
use rea_core::session::cookie::cookie_value;
use rea_core::session::{AccessToken, MemorySessionStore, SignInInfo, UserProfile};
use rea_core::validation::FormValidator;
use rea_core::{Session, SessionStore};
use rea_server::{AppState, Config, create_router, render::Renderer};

pub const COMPANY_NO: &str = "01234567";
pub const USER_EMAIL: &str = "officer@test.co.biz";
pub const TEST_EMAIL_EXISTING: &str = "test@test.co.biz";
pub const TEST_EMAIL_UPDATE: &str = "new_test@test.co.biz";

/// Remote clients for one test; set expectations before building the app.
#[derive(Default)]
pub struct TestClients {
    pub profiles: MockCompanyProfileClient,
    pub emails: MockEmailRegistryClient,
    pub transactions: MockTransactionClient,
}

pub struct TestApp {
    pub server: TestServer,
    pub sessions: Arc<MemorySessionStore>,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Stores `session` and returns the `Cookie` header that selects it.
    pub fn cookie_for(&self, session: Session) -> (HeaderName, HeaderValue) {
        let value = format!(
            "{}={}",
            self.config.cookie_name,
            cookie_value(session.id(), &self.config.cookie_secret)
        );
        self.sessions.insert(session);
        (
            header::COOKIE,
            HeaderValue::from_str(&value).expect("cookie header"),
        )
    }

    pub async fn session(&self, id: &str) -> Session {
        self.sessions
            .load(id)
            .await
            .expect("session store")
            .expect("session present")
    }
}

pub fn build_test_app(clients: TestClients) -> Result<TestApp> {
    let config = Arc::new(Config {
        chs_url: "http://chs.local".into(),
        account_url: "http://account.chs.local".into(),
        cookie_secret: "test-cookie-secret".into(),
        ..Config::default()
    });
    let sessions = Arc::new(MemorySessionStore::new());
    let renderer = Arc::new(Renderer::new(&config)?);

    let state = AppState {
        config: config.clone(),
        sessions: sessions.clone(),
        profiles: Arc::new(clients.profiles),
        emails: Arc::new(clients.emails),
        transactions: Arc::new(clients.transactions),
        renderer,
        validator: FormValidator::new(),
    };

    let server = TestServer::new(create_router(state))?;
    Ok(TestApp {
        server,
        sessions,
        config,
    })
}

pub fn company_profile() -> CompanyProfile {
    CompanyProfile {
        company_number: COMPANY_NO.into(),
        company_name: "Test Company Ltd".into(),
        company_status: Some("active".into()),
        company_type: Some("ltd".into()),
        date_of_creation: None,
        registered_office_address: None,
    }
}

/// A signed-in session, authorised for `authorised_company` when given.
pub fn signed_in_session(authorised_company: Option<&str>) -> Session {
    let mut session = Session::new();
    session.data.signin_info = Some(SignInInfo {
        signed_in: 1,
        access_token: Some(AccessToken {
            access_token: "oauth-token".into(),
        }),
        user_profile: Some(UserProfile {
            id: Some("user-1".into()),
            email: Some(USER_EMAIL.into()),
        }),
        company_number: authorised_company.map(str::to_string),
    });
    session
}

/// Signed in, authorised, with the company confirmed.
pub fn confirmed_company_session() -> Session {
    let mut session = signed_in_session(Some(COMPANY_NO));
    let extra = session.extra_mut();
    extra.company_number = Some(COMPANY_NO.into());
    extra.company_profile = Some(company_profile());
    extra.registered_email_address = Some(TEST_EMAIL_EXISTING.into());
    session
}
