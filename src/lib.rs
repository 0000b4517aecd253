//! # Cover session client
//!
//! Client-side session and access management for the Cover venue management
//! API. The crate owns three pieces that every screen of the product relies on:
//!
//! 1. **Session Manager** ([`features::auth::state::SessionManager`]): the single
//!    source of truth for "am I logged in and as whom". It restores a persisted
//!    token at startup, runs login/register/verify/logout, and publishes every
//!    transition to subscribers.
//! 2. **HTTP Gateway** ([`app_lib::api::Gateway`]): the one choke point for
//!    backend calls. It attaches the bearer token, normalizes errors, and clears
//!    the session when the backend answers 401.
//! 3. **Route Guard** ([`features::auth::guards`]): decides whether a view
//!    renders, waits, or redirects based on the current session.
//!
//! The session is an explicitly constructed object passed to whoever needs it;
//! there is no global state, so tests build a fresh instance each time.

#[path = "lib/mod.rs"]
pub mod app_lib;
pub mod cli;
pub mod features;
pub mod routes;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub use app_lib::GIT_COMMIT_HASH;
