use std::{future::ready, sync::Arc};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use rea_core::Session;
use rea_core::session::cookie::{cookie_value, verify_cookie_value};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::infra::app_state::AppState;
use crate::infra::config::Config;
use crate::infra::errors::{AppError, AppResult};

/// The request's session, shared between the middleware and the handler.
#[derive(Debug, Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().await
    }
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        ready(
            parts
                .extensions
                .get::<SessionHandle>()
                .cloned()
                .ok_or_else(|| AppError::internal("session middleware not installed")),
        )
    }
}

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

fn session_cookie(config: &Config, session: &Session) -> String {
    format!(
        "{}={}; Domain={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name,
        cookie_value(session.id(), &config.cookie_secret),
        config.cookie_domain,
        config.session_expiration.as_secs()
    )
}

/// Loads the session named by the signed cookie (or starts a new one), hands
/// it to the rest of the stack, and writes it back once the handler is done.
/// A new session nothing wrote to is dropped without a cookie.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let config = &state.config;

    let session_id = extract_cookie(request.headers(), &config.cookie_name)
        .and_then(|value| verify_cookie_value(&value, &config.cookie_secret));
    let existing = match &session_id {
        Some(id) => state.sessions.load(id).await?,
        None => None,
    };
    if session_id.is_some() && existing.is_none() {
        debug!("session cookie refers to an expired session");
    }

    let is_new = existing.is_none();
    let handle = SessionHandle::new(existing.unwrap_or_else(Session::new));
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    let session = handle.lock().await.clone();
    if is_new && session.is_empty() {
        return Ok(response);
    }
    state.sessions.save(&session).await?;

    if is_new {
        match HeaderValue::from_str(&session_cookie(config, &session)) {
            Ok(cookie) => {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            Err(err) => warn!(error = %err, "session cookie is not a valid header value"),
        }
    }

    Ok(response)
}
