//! HTTP glue: extract the session and form, run the page handler, and turn
//! its outcome into a render or a redirect.

pub mod company;
pub mod email;
pub mod index;

use crate::infra::middleware::SessionHandle;

async fn signed_in_email(session: &SessionHandle) -> Option<String> {
    session.lock().await.user_email().map(str::to_string)
}
