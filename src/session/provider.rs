//! Sign-in, token refresh and session shaping.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::graphql::operations::{CREATE_USER, FIND_USER_BY_EMAIL, LOGIN_USER};
use crate::graphql::{FetchPolicy, GraphqlClient, GraphqlError};

use super::credentials::Credentials;
use super::registration::{Registration, RegistrationForm};
use super::types::{
    AuthUser, NewUser, OAuthProfile, Session, SessionUser, Token, DEFAULT_ROLE,
    PROVIDER_AUTH_TYPE,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("User lookup failed: {0}")]
    Backend(#[from] GraphqlError),

    #[error("Profile has no email address")]
    MissingEmail,

    #[error("{0}")]
    Invalid(String),
}

impl SessionError {
    pub fn error_type(&self) -> &'static str {
        match self {
            SessionError::Backend(_) => "backend_error",
            SessionError::MissingEmail => "missing_email",
            SessionError::Invalid(_) => "validation_error",
        }
    }
}

/// Backend user lookups needed by the session layer.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by email and password.
    async fn login(&self, credentials: &Credentials) -> Result<Option<AuthUser>, GraphqlError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, GraphqlError>;

    async fn create_user(&self, user: &NewUser) -> Result<AuthUser, GraphqlError>;
}

/// [`UserDirectory`] backed by the GraphQL API.
#[derive(Clone)]
pub struct GraphqlUserDirectory {
    client: GraphqlClient,
}

impl GraphqlUserDirectory {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserDirectory for GraphqlUserDirectory {
    async fn login(&self, credentials: &Credentials) -> Result<Option<AuthUser>, GraphqlError> {
        let variables = json!({
            "email": credentials.email,
            "password": credentials.password.expose(),
        });
        self.client
            .query(&LOGIN_USER, "findUserByEmail", &variables, FetchPolicy::NoCache)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, GraphqlError> {
        self.client
            .query(
                &FIND_USER_BY_EMAIL,
                "getUserByEmail",
                &json!({ "email": email }),
                FetchPolicy::NetworkOnly,
            )
            .await
    }

    async fn create_user(&self, user: &NewUser) -> Result<AuthUser, GraphqlError> {
        self.client
            .mutate(&CREATE_USER, "createUser", &json!({ "data": user }))
            .await
    }
}

/// Split a display name into first word and the rest.
pub fn split_display_name(name: Option<&str>) -> (String, String) {
    let mut words = name.unwrap_or_default().split(' ');
    let first = words.next().unwrap_or_default().to_string();
    let rest = words.collect::<Vec<_>>().join(" ");
    (first, rest)
}

pub struct SessionManager<D> {
    directory: D,
}

impl<D: UserDirectory> SessionManager<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Email/password sign-in. Lookup errors are logged and treated as a
    /// rejected login.
    pub async fn authorize_credentials(&self, credentials: &Credentials) -> Option<AuthUser> {
        match self.directory.login(credentials).await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "Credentials accepted");
                Some(user)
            }
            Ok(None) => {
                debug!(email = %credentials.email, "Credentials rejected");
                None
            }
            Err(e) => {
                warn!(error = %e, error_type = e.error_type(), "Credential lookup failed");
                None
            }
        }
    }

    /// OAuth sign-in. Creates the backend user on first sign-in. Any
    /// backend error rejects the sign-in.
    pub async fn sign_in_oauth(&self, profile: &OAuthProfile) -> Result<AuthUser, SessionError> {
        if profile.email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }

        if let Some(existing) = self.directory.find_by_email(&profile.email).await? {
            debug!(user_id = %existing.id, "OAuth user already exists");
            return Ok(existing);
        }

        let (first_name, last_name) = split_display_name(profile.name.as_deref());
        let new_user = NewUser {
            first_name,
            last_name,
            password: String::new(),
            phone: String::new(),
            auth_type: PROVIDER_AUTH_TYPE.to_string(),
            rol: DEFAULT_ROLE.to_string(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            image: profile.image.clone().unwrap_or_default(),
        };
        let created = self.directory.create_user(&new_user).await?;
        info!(user_id = %created.id, "Created OAuth user");
        Ok(created)
    }

    /// Create a password account, then sign in with the same credentials.
    /// A failed sign-in still counts as a registration; the caller sends
    /// the user to the login page instead.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Registration, SessionError> {
        form.validate()?;

        let new_user = form.to_new_user();
        let user = self.directory.create_user(&new_user).await?;
        info!(user_id = %user.id, "Registered user");

        let credentials = Credentials::new(new_user.email.clone(), form.password.expose());
        let signed_in = self.authorize_credentials(&credentials).await;
        Ok(Registration {
            email: new_user.email,
            user,
            signed_in,
        })
    }

    /// Refresh the token claims. `user` is set right after a sign-in.
    /// The backend is always re-queried by email so profile edits show up
    /// without signing in again. Lookup failures leave the token as is.
    pub async fn refresh_token(&self, mut token: Token, user: Option<&AuthUser>) -> Token {
        if let Some(user) = user {
            token.user_id = Some(user.id.clone());
            token.first_name = Some(user.first_name.clone());
            token.last_name = user.last_name.clone();
            token.rol = Some(user.rol.clone());
            token.auth_type = Some(user.auth_type.clone());
            token.phone = user.phone.clone();
            token.access_token = user.token.clone();
        }

        let email = user
            .and_then(|u| u.email.clone())
            .or_else(|| token.email.clone());
        let Some(email) = email else {
            debug!("Token has no email, skipping refresh lookup");
            return token;
        };

        match self.directory.find_by_email(&email).await {
            Ok(Some(fresh)) => {
                token.first_name = Some(fresh.first_name);
                token.last_name = fresh.last_name;
                token.phone = fresh.phone;
                token.name = fresh.name;
                token.access_token = fresh.token;
            }
            Ok(None) => debug!(email = %email, "No backend user for token"),
            Err(e) => warn!(error = %e, "Token refresh lookup failed"),
        }
        token
    }
}

/// Shape the session exposed to the app, filling defaults for missing
/// claims.
pub fn session_from_token(token: &Token) -> Session {
    let user = SessionUser {
        id: token
            .user_id
            .clone()
            .or_else(|| token.sub.clone())
            .unwrap_or_default(),
        first_name: token.first_name.clone().unwrap_or_default(),
        last_name: token.last_name.clone().unwrap_or_default(),
        name: token.name.clone().unwrap_or_default(),
        email: token.email.clone(),
        image: String::new(),
        rol: token
            .rol
            .clone()
            .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        auth_type: token
            .auth_type
            .clone()
            .unwrap_or_else(|| PROVIDER_AUTH_TYPE.to_string()),
        phone: token.phone.clone().unwrap_or_default(),
    };
    Session {
        user,
        access_token: token.access_token.clone(),
    }
}

impl Session {
    /// Attach this session's access token to outgoing GraphQL requests.
    pub fn attach_to(&self, client: &GraphqlClient) {
        client.set_access_token(self.access_token.clone());
    }
}
