use crate::{
    cli::globals::GlobalArgs,
    features::auth::{AuthStatus, User},
    routes::History,
};
use anyhow::Result;
use std::sync::Arc;

/// One-line summary of a user for terminal output.
#[must_use]
pub fn describe(user: &User) -> String {
    format!("{} <{}> ({})", user.display_name, user.email, user.role)
}

/// Execute the whoami action.
/// # Errors
/// Returns an error if the configured API base URL is invalid.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let config = globals.config();
    let session = globals.session(&config, Arc::new(History::default()))?;
    let current = session.restore().await;

    match (current.status(), current.user()) {
        (AuthStatus::Authenticated, Some(user)) => println!("{}", describe(user)),
        (AuthStatus::Error, _) => {
            let message = current.error().unwrap_or("Session could not be verified.");
            match session.store().cached_user() {
                Some(user) => println!("{} (not verified: {message})", describe(&user)),
                None => println!("Not verified: {message}"),
            }
        }
        _ => match current.error() {
            Some(message) => println!("Not signed in: {message}"),
            None => println!("Not signed in"),
        },
    }

    Ok(())
}
