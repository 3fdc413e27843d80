use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use rea_core::routes;
use tracing::info;

use super::{SessionHandle, encode_query_value};

/// Sends anonymous users to sign in, returning them here afterwards.
pub async fn authentication_middleware(
    session: SessionHandle,
    request: Request,
    next: Next,
) -> Response {
    let signed_in = {
        let session = session.lock().await;
        session
            .is_signed_in()
            .then(|| session.user_email().unwrap_or_default().to_string())
    };

    match signed_in {
        Some(user_email) => {
            info!(user_email = %user_email, "user is signed in");
            next.run(request).await
        }
        None => {
            let return_to = request
                .uri()
                .path_and_query()
                .map(|path| path.as_str())
                .unwrap_or(routes::HOME);
            info!("user not authenticated, redirecting to sign in page");
            Redirect::to(&format!(
                "{}?return_to={}",
                routes::SIGN_IN,
                encode_query_value(return_to)
            ))
            .into_response()
        }
    }
}
