//! Auth feature module covering session state, the auth endpoints, form validation
//! and view guarding. It keeps authentication logic out of screens and must stay
//! aligned with backend expectations. This module handles tokens and passwords and
//! must avoid logging secrets or token material.
//!
//! Flow Overview: startup restores the persisted token and verifies it against the
//! `me` endpoint. Login validates input, posts credentials and persists the returned
//! token. Logout clears memory and the persisted slot without a network call. A `401`
//! seen by the gateway expires the session and redirects to login.

pub mod client;
pub mod guards;
pub mod state;
pub mod token;
pub mod types;
pub mod validation;

pub use guards::{AccessClass, GuardDecision, RouteGuard};
pub use state::{RegisterOutcome, SessionManager, SessionStore};
pub use token::AuthToken;
pub use types::{AuthStatus, Role, Session, User, UserId};
pub use validation::{Credentials, PasswordReset, Registration};
