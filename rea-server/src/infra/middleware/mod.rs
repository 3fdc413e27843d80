pub mod authentication;
pub mod company_authentication;
pub mod session;

pub use authentication::authentication_middleware;
pub use company_authentication::company_authentication_middleware;
pub use session::{SessionHandle, session_middleware};

use url::form_urlencoded;

/// Percent-encodes a value so it can travel as a single query parameter.
pub(crate) fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
