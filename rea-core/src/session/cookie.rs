use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rng};
use sha2::{Digest, Sha256};

pub const SESSION_ID_LENGTH: usize = 28;
pub const SIGNATURE_LENGTH: usize = 27;

/// 21 random bytes, which encode to exactly [`SESSION_ID_LENGTH`] characters.
pub fn generate_session_id() -> String {
    let mut id_bytes = [0u8; 21];
    rng().fill_bytes(&mut id_bytes);
    URL_SAFE_NO_PAD.encode(id_bytes)
}

pub fn sign(session_id: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(secret.as_bytes());
    let mut signature = URL_SAFE_NO_PAD.encode(hasher.finalize());
    signature.truncate(SIGNATURE_LENGTH);
    signature
}

/// Cookie value: the session id immediately followed by its signature.
pub fn cookie_value(session_id: &str, secret: &str) -> String {
    format!("{}{}", session_id, sign(session_id, secret))
}

/// Returns the session id when the cookie value carries a valid signature.
pub fn verify_cookie_value(value: &str, secret: &str) -> Option<String> {
    if value.len() != SESSION_ID_LENGTH + SIGNATURE_LENGTH || !value.is_ascii() {
        return None;
    }

    let (session_id, signature) = value.split_at(SESSION_ID_LENGTH);
    (sign(session_id, secret) == signature).then(|| session_id.to_string())
}
