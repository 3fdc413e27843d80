//! The session is the only state this service owns. Each flow field lives in
//! a typed slot on [`ExtraData`]; sign-in details are written by the account
//! service and only read here.

pub mod cookie;
pub mod store;

pub use store::{MemorySessionStore, RedisSessionStore, SessionStore};

use serde::{Deserialize, Serialize};

use crate::models::CompanyProfile;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(skip)]
    id: String,
    #[serde(default)]
    pub data: SessionData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signin_info: Option<SignInInfo>,
    #[serde(default)]
    pub extra_data: ExtraData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInInfo {
    #[serde(default)]
    pub signed_in: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
    /// Company the user has authenticated against, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Flow state. Keys serialise to the names listed in [`crate::constants`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_profile: Option<CompanyProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_company_email: Option<String>,
    /// Id of the transaction closed by the last successful submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_out_return_page: Option<String>,
}

impl Session {
    /// A fresh, empty session with a newly generated id.
    pub fn new() -> Self {
        Self::with_id(cookie::generate_session_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: SessionData::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// True while nothing has been written to the session.
    pub fn is_empty(&self) -> bool {
        self.data == SessionData::default()
    }

    pub fn extra(&self) -> &ExtraData {
        &self.data.extra_data
    }

    pub fn extra_mut(&mut self) -> &mut ExtraData {
        &mut self.data.extra_data
    }

    pub fn is_signed_in(&self) -> bool {
        self.data
            .signin_info
            .as_ref()
            .is_some_and(|info| info.signed_in == 1)
    }

    pub fn user_email(&self) -> Option<&str> {
        self.data
            .signin_info
            .as_ref()?
            .user_profile
            .as_ref()?
            .email
            .as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.data
            .signin_info
            .as_ref()?
            .access_token
            .as_ref()
            .map(|token| token.access_token.as_str())
    }

    pub fn authorised_company_number(&self) -> Option<&str> {
        self.data.signin_info.as_ref()?.company_number.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    #[test]
    fn test_extra_data_keys_match_session_key_names() {
        let extra = ExtraData {
            company_number: Some("01234567".into()),
            registered_email_address: Some("test@test.co.biz".into()),
            submission_id: Some("178417-909116-690426".into()),
            new_email_address: Some("new_test@test.co.biz".into()),
            updated_company_email: Some("new_test@test.co.biz".into()),
            sign_out_return_page: Some("/registered-email-address".into()),
            ..Default::default()
        };

        let value = serde_json::to_value(&extra).unwrap();
        for key in [
            constants::COMPANY_NUMBER,
            constants::REGISTERED_EMAIL_ADDRESS,
            constants::SUBMISSION_ID,
            constants::NEW_EMAIL_ADDRESS,
            constants::UPDATED_COMPANY_EMAIL,
            constants::SIGN_OUT_RETURN_PAGE,
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_signed_in_accessors() {
        let mut session = Session::with_id("abc");
        assert!(!session.is_signed_in());
        assert_eq!(session.user_email(), None);

        session.data.signin_info = Some(SignInInfo {
            signed_in: 1,
            access_token: Some(AccessToken {
                access_token: "token".into(),
            }),
            user_profile: Some(UserProfile {
                id: Some("user-1".into()),
                email: Some("officer@test.co.biz".into()),
            }),
            company_number: Some("01234567".into()),
        });

        assert!(session.is_signed_in());
        assert_eq!(session.user_email(), Some("officer@test.co.biz"));
        assert_eq!(session.access_token(), Some("token"));
        assert_eq!(session.authorised_company_number(), Some("01234567"));
    }

    #[test]
    fn test_is_empty_until_written() {
        let mut session = Session::new();
        assert!(session.is_empty());

        session.extra_mut().sign_out_return_page = Some("/registered-email-address".into());
        assert!(!session.is_empty());
    }

    #[test]
    fn test_session_id_is_not_serialised() {
        let session = Session::with_id("abc");
        let raw = serde_json::to_string(&session).unwrap();
        assert!(!raw.contains("abc"));
    }
}
