use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use rea_core::routes::{self, views};
use rea_core::workflow::{
    CompanyNumberForm, CompanySearchHandler, ConfirmCompanyHandler, ConfirmOutcome,
    invalid_company_view,
};
use serde::Deserialize;

use super::signed_in_email;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::middleware::SessionHandle;

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(rename = "companyNumber")]
    pub company_number: Option<String>,
}

pub async fn number(State(state): State<AppState>, session: SessionHandle) -> AppResult<Html<String>> {
    let user_email = signed_in_email(&session).await;
    let view_data =
        CompanySearchHandler::new(state.validator, state.profiles.as_ref(), user_email).get();
    state.renderer.render(views::COMPANY_NUMBER, &view_data)
}

pub async fn lookup(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<CompanyNumberForm>,
) -> AppResult<Response> {
    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    match CompanySearchHandler::new(state.validator, state.profiles.as_ref(), user_email)
        .post(&mut session, &form)
        .await
    {
        Ok(_) => Ok(Redirect::to(routes::company::CONFIRM).into_response()),
        Err(view_data) => Ok(state
            .renderer
            .render(views::COMPANY_NUMBER, &view_data)?
            .into_response()),
    }
}

pub async fn confirm(
    State(state): State<AppState>,
    session: SessionHandle,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Html<String>> {
    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    match ConfirmCompanyHandler::new(state.profiles.as_ref(), state.emails.as_ref(), user_email)
        .get(&mut session, query.company_number.as_deref())
        .await
    {
        Ok(view_data) => state.renderer.render(views::COMPANY_CONFIRM, &view_data),
        Err(view_data) => state.renderer.render(views::COMPANY_NUMBER, &view_data),
    }
}

pub async fn confirmed(State(state): State<AppState>, session: SessionHandle) -> AppResult<Response> {
    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    match ConfirmCompanyHandler::new(state.profiles.as_ref(), state.emails.as_ref(), user_email)
        .post(&mut session)
        .await
    {
        Ok(ConfirmOutcome::Confirmed) => {
            Ok(Redirect::to(routes::email::CHANGE_EMAIL_ADDRESS).into_response())
        }
        Ok(ConfirmOutcome::NoRegisteredEmail) => {
            Ok(Redirect::to(routes::company::INVALID).into_response())
        }
        Ok(ConfirmOutcome::LookupFailed) => Err(AppError::bad_gateway(
            "registered email address lookup failed",
        )),
        Err(view_data) => Ok(state
            .renderer
            .render(views::COMPANY_NUMBER, &view_data)?
            .into_response()),
    }
}

pub async fn invalid(State(state): State<AppState>, session: SessionHandle) -> AppResult<Html<String>> {
    let session = session.lock().await;
    let view_data = invalid_company_view(&session, session.user_email().map(str::to_string));
    state.renderer.render(views::COMPANY_INVALID, &view_data)
}
