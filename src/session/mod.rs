//! Authentication: registration, credential and OAuth sign-in, token
//! refresh, session shaping and route protection.

mod credentials;
mod guard;
mod provider;
mod registration;
mod types;

pub use credentials::{Credentials, SecureString};
pub use guard::{guard, GuardDecision};
pub use provider::{
    session_from_token, split_display_name, GraphqlUserDirectory, SessionError, SessionManager,
    UserDirectory,
};
pub use registration::{Registration, RegistrationForm, MANUAL_AUTH_TYPE};
pub(crate) use registration::{
    is_valid_name, is_valid_password, password_length_message, MIN_NAME_LEN,
};
pub use types::{AuthUser, NewUser, OAuthProfile, Session, SessionUser, Token};
