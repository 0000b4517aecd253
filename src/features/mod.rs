//! Domain-level client features and their shared logic. Screens import these modules
//! to keep view code focused while session and API handling stay in dedicated
//! feature areas.

pub mod auth;
