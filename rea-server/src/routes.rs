use axum::{Router, middleware, routing::get};
use rea_core::routes;
use tower_http::trace::TraceLayer;

use crate::handlers::{company, email, index};
use crate::infra::app_state::AppState;
use crate::infra::middleware::{
    authentication_middleware, company_authentication_middleware, session_middleware,
};

/// Pages that need a signed-in user and a session.
fn company_routes() -> Router<AppState> {
    Router::new()
        .route(routes::company::NUMBER, get(company::number).post(company::lookup))
        .route(routes::company::CONFIRM, get(company::confirm).post(company::confirmed))
        .route(routes::company::INVALID, get(company::invalid))
        .route_layer(middleware::from_fn(authentication_middleware))
}

/// Pages that additionally need the user to be authorised for the company.
fn email_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            routes::email::CHANGE_EMAIL_ADDRESS,
            get(email::change_email_address).post(email::submit_email_address),
        )
        .route(
            routes::email::CHECK_ANSWER,
            get(email::check_answer).post(email::submit_answer),
        )
        .route(routes::email::UPDATE_SUBMITTED, get(email::update_submitted))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            company_authentication_middleware,
        ))
        .route_layer(middleware::from_fn(authentication_middleware))
}

pub fn create_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route(routes::HOME, get(index::home).post(index::start))
        .route(routes::SIGN_OUT, get(index::sign_out).post(index::sign_out_decision))
        .merge(company_routes())
        .merge(email_routes(&state))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware));

    // Static pages stay reachable when the session store is down.
    Router::new()
        .route(routes::HEALTHCHECK, get(index::healthcheck))
        .route(routes::ACCESSIBILITY_STATEMENT, get(index::accessibility_statement))
        .route(routes::THERE_IS_A_PROBLEM, get(index::there_is_a_problem))
        .merge(session_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
