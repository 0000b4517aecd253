//! Session model and request/response payloads for the auth endpoints. All payloads
//! use `snake_case` field names. Request types borrow credentials only for the
//! duration of a call and must never be logged.

use super::token::AuthToken;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(formatter, "{id}"),
            UserId::Text(id) => formatter.write_str(id),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Client,
    Staff,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Client => "client",
            Role::Staff => "staff",
            Role::Admin => "admin",
        };
        formatter.write_str(name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// User record owned by the session; replaced wholesale on login and verify.
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
    /// Signed out because the auth state could not be established (transport failure).
    Error,
}

/// Client-held record of whether a user is authenticated and who they are.
///
/// Fields are private so every value satisfies: `Authenticated` iff both token and
/// user are present, and no token implies no user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    status: AuthStatus,
    token: Option<AuthToken>,
    user: Option<User>,
    error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl Session {
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            token: None,
            user: None,
            error: None,
        }
    }

    /// Signed out after the backend rejected the credentials or token.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::signed_out()
        }
    }

    /// Signed out because the backend could not be reached.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Error,
            error: Some(message.into()),
            ..Self::signed_out()
        }
    }

    /// A call is in flight; `token` is the credential being checked, if any.
    #[must_use]
    pub fn authenticating(token: Option<AuthToken>) -> Self {
        Self {
            status: AuthStatus::Authenticating,
            token,
            user: None,
            error: None,
        }
    }

    #[must_use]
    pub fn authenticated(token: AuthToken, user: User) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            token: Some(token),
            user: Some(user),
            error: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.status
    }

    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Message from the last failed operation, cleared by the next transition.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    #[must_use]
    pub fn is_authenticating(&self) -> bool {
        self.status == AuthStatus::Authenticating
    }

    /// True for `Unauthenticated` and `Error`.
    #[must_use]
    pub fn is_signed_out(&self) -> bool {
        matches!(self.status, AuthStatus::Unauthenticated | AuthStatus::Error)
    }

    /// Checks the structural invariants; used by tests after every operation.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let both = self.token.is_some() && self.user.is_some();
        let authenticated = self.status == AuthStatus::Authenticated;
        authenticated == both && (self.token.is_some() || self.user.is_none())
    }
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub display_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
}

#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
/// Token-bearing response of login (and register in auto-login mode). Some backends
/// omit the user, in which case it is fetched from the `me` endpoint.
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}
