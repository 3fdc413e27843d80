use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use rea_core::routes;
use tracing::info;

use super::{SessionHandle, encode_query_value};
use crate::infra::app_state::AppState;

/// Lets the request through only when the signed-in user has authenticated
/// against the company this flow is updating. Otherwise the user is sent to
/// the company sign-in page.
pub async fn company_authentication_middleware(
    State(state): State<AppState>,
    session: SessionHandle,
    request: Request,
    next: Next,
) -> Response {
    let (company_number, authorised) = {
        let session = session.lock().await;
        let company_number = session.extra().company_number.clone();
        let authorised = company_number.is_some()
            && session.authorised_company_number() == company_number.as_deref();
        (company_number, authorised)
    };

    if authorised {
        return next.run(request).await;
    }

    let Some(company_number) = company_number else {
        info!("no company selected, redirecting to company number page");
        return Redirect::to(routes::company::NUMBER).into_response();
    };

    let return_to = request
        .uri()
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or(routes::HOME);
    info!(company_number = %company_number, "user not authorised for company, redirecting to company sign in");
    Redirect::to(&company_sign_in_url(
        &state.config.chs_url,
        return_to,
        &company_number,
    ))
    .into_response()
}

fn company_sign_in_url(chs_url: &str, return_to: &str, company_number: &str) -> String {
    format!(
        "{}/signin?return_to={}&company_number={}",
        chs_url.trim_end_matches('/'),
        encode_query_value(return_to),
        encode_query_value(company_number)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_sign_in_url_encodes_both_parameters() {
        assert_eq!(
            company_sign_in_url("http://chs.local/", "/a?b=1", "01234567"),
            "http://chs.local/signin?return_to=%2Fa%3Fb%3D1&company_number=01234567"
        );
        assert_eq!(
            company_sign_in_url("http://chs.local", "/", "SC1&x=y"),
            "http://chs.local/signin?return_to=%2F&company_number=SC1%26x%3Dy"
        );
    }
}
