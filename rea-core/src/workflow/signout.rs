use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::constants::{
    ERROR_TITLE_PREFIX, SIGN_OUT_ERROR_ANCHOR, SIGN_OUT_ERROR_KEY, SIGN_OUT_NOT_SELECTED,
    SIGN_OUT_PAGE_TITLE,
};
use crate::routes;
use crate::session::Session;
use crate::view::{ViewData, format_validation_error};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignOutForm {
    #[serde(default)]
    pub signout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutDecision {
    Redirect(String),
    Render(ViewData),
}

#[derive(Debug)]
pub struct SignOutHandler {
    account_signout_url: String,
    view_data: ViewData,
}

impl SignOutHandler {
    pub fn new(account_url: &str, user_email: Option<String>) -> Self {
        Self {
            account_signout_url: format!("{}/signout", account_url.trim_end_matches('/')),
            view_data: ViewData {
                title: Some(SIGN_OUT_PAGE_TITLE.to_string()),
                user_email,
                ..ViewData::default()
            },
        }
    }

    /// Remembers where the user came from so "no" can send them back.
    pub fn get(mut self, session: &mut Session, referrer: Option<&str>) -> ViewData {
        info!("GET request to serve sign out page");

        if let Some(page) = referrer.and_then(local_return_page) {
            session.extra_mut().sign_out_return_page = Some(page);
        }
        self.view_data.back_uri = Some(return_page(session));
        self.view_data
    }

    pub fn post(mut self, session: &Session, form: &SignOutForm) -> SignOutDecision {
        match form.signout.as_deref() {
            Some("yes") => SignOutDecision::Redirect(self.account_signout_url),
            Some("no") => SignOutDecision::Redirect(return_page(session)),
            _ => {
                self.view_data.title = Some(format!("{ERROR_TITLE_PREFIX}{SIGN_OUT_PAGE_TITLE}"));
                self.view_data.back_uri = Some(return_page(session));
                self.view_data.errors = Some(format_validation_error(
                    SIGN_OUT_ERROR_KEY,
                    SIGN_OUT_ERROR_ANCHOR,
                    SIGN_OUT_NOT_SELECTED,
                ));
                SignOutDecision::Render(self.view_data)
            }
        }
    }
}

/// The stored return page, or the service home page.
pub fn return_page(session: &Session) -> String {
    session
        .extra()
        .sign_out_return_page
        .clone()
        .unwrap_or_else(|| routes::HOME.to_string())
}

/// Reduces a `Referer` header to a path inside this service. Anything else
/// (other hosts' pages, the sign-out page itself) is ignored.
fn local_return_page(referrer: &str) -> Option<String> {
    let base = Url::parse("http://localhost").ok()?;
    let url = base.join(referrer).ok()?;

    let path = url.path();
    if !path.starts_with(routes::HOME) || path.starts_with(routes::SIGN_OUT) {
        debug!(referrer, "ignoring sign out referrer");
        return None;
    }

    Some(match url.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    })
}
