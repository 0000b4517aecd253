use crate::{cli::globals::GlobalArgs, routes::History};
use anyhow::Result;
use std::sync::Arc;

/// Execute the logout action. No network call is made.
/// # Errors
/// Returns an error if the configured API base URL is invalid.
pub fn execute(globals: &GlobalArgs) -> Result<()> {
    let config = globals.config();
    let session = globals.session(&config, Arc::new(History::default()))?;
    session.logout();
    println!("Signed out");
    Ok(())
}
