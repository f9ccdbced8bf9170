//! Email/password account registration.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use super::credentials::SecureString;
use super::provider::SessionError;
use super::types::{AuthUser, NewUser, DEFAULT_ROLE};

/// `authType` of users who registered with a password.
pub const MANUAL_AUTH_TYPE: &str = "MANUAL";

pub(crate) const MIN_NAME_LEN: usize = 3;
const PASSWORD_LEN: RangeInclusive<usize> = 12..=24;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s'-]+$").expect("name pattern compiles"));

/// At least three characters, letters and a few separators only.
pub(crate) fn is_valid_name(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.chars().count() >= MIN_NAME_LEN && NAME_RE.is_match(trimmed)
}

pub(crate) fn is_valid_password(password: &str) -> bool {
    PASSWORD_LEN.contains(&password.chars().count())
}

pub(crate) fn password_length_message() -> String {
    format!(
        "Password must be between {} and {} characters long",
        PASSWORD_LEN.start(),
        PASSWORD_LEN.end()
    )
}

/// Registration form as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecureString,
    pub phone: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.first_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(SessionError::Invalid(
                "First name, email and password are required".to_string(),
            ));
        }
        for (label, value) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
            if !is_valid_name(value) {
                return Err(SessionError::Invalid(format!(
                    "{} must be at least {} letters and contain only valid characters",
                    label, MIN_NAME_LEN
                )));
            }
        }
        if !is_valid_password(self.password.expose()) {
            return Err(SessionError::Invalid(password_length_message()));
        }
        Ok(())
    }

    /// `createUser` payload for this form.
    pub fn to_new_user(&self) -> NewUser {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        NewUser {
            name: Some(format!("{} {}", first_name, last_name)),
            first_name,
            last_name,
            password: self.password.expose().to_string(),
            phone: self.phone.trim().to_string(),
            auth_type: MANUAL_AUTH_TYPE.to_string(),
            rol: DEFAULT_ROLE.to_string(),
            email: self.email.trim().to_string(),
            image: String::new(),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub user: AuthUser,
    /// Set when the follow-up credentials sign-in succeeded.
    pub signed_in: Option<AuthUser>,
}

impl Registration {
    /// Where to send the browser next: the account page when signed in,
    /// otherwise the login page prefilled with the email.
    pub fn redirect(&self) -> String {
        if self.signed_in.is_some() {
            return "/account".to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("registrationSuccess", "true")
            .append_pair("email", &self.email)
            .finish();
        format!("/login?{}", query)
    }
}
