use serde::{Deserialize, Deserializer, Serialize};

use super::credentials::SecureString;

pub const DEFAULT_ROLE: &str = "USER";
pub const PROVIDER_AUTH_TYPE: &str = "PROVIDER";

/// User record returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_role")]
    pub rol: String,
    #[serde(default = "default_auth_type")]
    pub auth_type: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Backend access token.
    #[serde(default)]
    pub token: Option<SecureString>,
}

/// Identity handed over by an external OAuth provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

/// Payload of the `createUser` mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub phone: String,
    pub auth_type: String,
    pub rol: String,
    pub name: Option<String>,
    pub email: String,
    pub image: String,
}

/// Claims carried between requests once a user signed in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Token {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub rol: Option<String>,
    pub auth_type: Option<String>,
    pub phone: Option<String>,
    pub access_token: Option<SecureString>,
}

impl Token {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub email: Option<String>,
    pub image: String,
    pub rol: String,
    pub auth_type: String,
    pub phone: String,
}

/// What the rest of the app sees of a signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: Option<SecureString>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_auth_type() -> String {
    PROVIDER_AUTH_TYPE.to_string()
}

/// Backends disagree on whether ids are numbers or strings.
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
