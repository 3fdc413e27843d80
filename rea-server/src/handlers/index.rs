use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use rea_core::routes::{self, views};
use rea_core::workflow::{
    SignOutDecision, SignOutForm, SignOutHandler, accessibility_statement_view, home_view,
    there_is_a_problem_view,
};

use super::signed_in_email;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::middleware::SessionHandle;

pub async fn healthcheck() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn home(State(state): State<AppState>, session: SessionHandle) -> AppResult<Html<String>> {
    let view_data = home_view(signed_in_email(&session).await);
    state.renderer.render(views::HOME, &view_data)
}

pub async fn start() -> Redirect {
    Redirect::to(routes::company::NUMBER)
}

pub async fn sign_out(
    State(state): State<AppState>,
    session: SessionHandle,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());

    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);
    let view_data =
        SignOutHandler::new(&state.config.account_url, user_email).get(&mut session, referrer);
    state.renderer.render(views::SIGN_OUT, &view_data)
}

pub async fn sign_out_decision(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<SignOutForm>,
) -> AppResult<Response> {
    let session = session.lock().await;
    let handler = SignOutHandler::new(
        &state.config.account_url,
        session.user_email().map(str::to_string),
    );

    match handler.post(&session, &form) {
        SignOutDecision::Redirect(location) => Ok(Redirect::to(&location).into_response()),
        SignOutDecision::Render(view_data) => Ok(state
            .renderer
            .render(views::SIGN_OUT, &view_data)?
            .into_response()),
    }
}

pub async fn accessibility_statement(State(state): State<AppState>) -> AppResult<Html<String>> {
    state
        .renderer
        .render(views::ACCESSIBILITY_STATEMENT, &accessibility_statement_view(None))
}

pub async fn there_is_a_problem(State(state): State<AppState>) -> AppResult<Html<String>> {
    state
        .renderer
        .render(views::THERE_IS_A_PROBLEM, &there_is_a_problem_view())
}
