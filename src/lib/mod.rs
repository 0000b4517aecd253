//! Shared client utilities for API access, configuration, errors, persisted state,
//! and build metadata.
//!
//! ## Core Session Flows
//!
//! ### Startup
//!
//! 1. **Restore:** The session manager reads the persisted token slot. No token means
//!    the session settles as unauthenticated without touching the network.
//! 2. **Verify:** A persisted token is re-validated against the `me` endpoint. The
//!    session stays `authenticating` until the call resolves, so guards show a
//!    loading placeholder instead of flashing the wrong view.
//!
//! ### Login & Register
//!
//! 1. **Validate:** Form input is checked locally; invalid input never reaches the API.
//! 2. **Submit:** Credentials are POSTed through the gateway. A token in the response
//!    is persisted together with a cached copy of the user record.
//! 3. **Register:** Whether registration signs the user in is an explicit
//!    [`config::RegisterMode`], chosen by the calling application.
//!
//! ### Expiry
//!
//! Any call answered with `401` clears the session and both persisted keys once, then
//! sends the user to `/login` unless they are already on an auth entry view.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids duplicated
//! logic in features and routes. Tokens and passwords are wrapped in
//! `secrecy::SecretString`; callers must still avoid logging them.

pub mod api;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod config;
pub mod errors;
pub mod storage;

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use api::Gateway;
pub use config::{AppConfig, Endpoints, RegisterMode};
pub use errors::{AppError, FieldErrors};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
