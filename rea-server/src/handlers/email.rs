use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use rea_core::constants::{COMPANY_NUMBER_PAGE_TITLE, ERROR_TITLE_PREFIX};
use rea_core::routes::{self, views};
use rea_core::workflow::{
    ChangeEmailAddressHandler, ChangeEmailForm, CheckAnswerForm, CheckAnswerHandler,
    RejectionKind, update_submitted_view,
};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::middleware::SessionHandle;

pub async fn change_email_address(
    State(state): State<AppState>,
    session: SessionHandle,
) -> AppResult<Html<String>> {
    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    match ChangeEmailAddressHandler::new(state.validator, state.transactions.as_ref(), user_email)
        .get(&mut session)
        .await
    {
        Ok(view_data) => state.renderer.render(views::CHANGE_EMAIL_ADDRESS, &view_data),
        Err(mut view_data) => {
            // No usable company or transaction: start the journey again.
            view_data.title = Some(format!("{ERROR_TITLE_PREFIX}{COMPANY_NUMBER_PAGE_TITLE}"));
            view_data.back_uri = Some(routes::HOME.to_string());
            state.renderer.render(views::COMPANY_NUMBER, &view_data)
        }
    }
}

pub async fn submit_email_address(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<ChangeEmailForm>,
) -> AppResult<Response> {
    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    match ChangeEmailAddressHandler::new(state.validator, state.transactions.as_ref(), user_email)
        .post(&mut session, &form)
        .await
    {
        Ok(_) => Ok(Redirect::to(routes::email::CHECK_ANSWER).into_response()),
        Err(view_data) => Ok(state
            .renderer
            .render(views::CHANGE_EMAIL_ADDRESS, &view_data)?
            .into_response()),
    }
}

pub async fn check_answer(
    State(state): State<AppState>,
    session: SessionHandle,
) -> AppResult<Response> {
    let session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    match CheckAnswerHandler::new(state.transactions.as_ref(), user_email).get(&session) {
        Ok(view_data) => Ok(state
            .renderer
            .render(views::CHECK_ANSWER, &view_data)?
            .into_response()),
        Err(_) => Ok(Redirect::to(routes::email::CHANGE_EMAIL_ADDRESS).into_response()),
    }
}

pub async fn submit_answer(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<CheckAnswerForm>,
) -> AppResult<Response> {
    let mut session = session.lock().await;
    let user_email = session.user_email().map(str::to_string);

    let rejection = match CheckAnswerHandler::new(state.transactions.as_ref(), user_email)
        .post(&mut session, &form)
        .await
    {
        Ok(_) => return Ok(Redirect::to(routes::email::UPDATE_SUBMITTED).into_response()),
        Err(rejection) => rejection,
    };

    if rejection.is_form_error() {
        return Ok(state
            .renderer
            .render(views::CHECK_ANSWER, &rejection.view_data)?
            .into_response());
    }

    let message = rejection
        .view_data
        .statement_error
        .unwrap_or_else(|| "no submission in progress".to_string());
    Err(match rejection.kind {
        RejectionKind::TransactionClose => AppError::bad_gateway(message),
        _ => AppError::new(StatusCode::CONFLICT, message),
    })
}

pub async fn update_submitted(
    State(state): State<AppState>,
    session: SessionHandle,
) -> AppResult<Html<String>> {
    let session = session.lock().await;
    let view_data = update_submitted_view(&session, session.user_email().map(str::to_string))
        .map_err(|_| AppError::new(StatusCode::CONFLICT, "nothing has been submitted"))?;
    state.renderer.render(views::UPDATE_SUBMITTED, &view_data)
}
