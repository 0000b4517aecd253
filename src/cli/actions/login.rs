use crate::{
    cli::{actions::whoami::describe, globals::GlobalArgs},
    features::auth::Credentials,
    routes::{History, paths},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the input is invalid, the credentials are rejected, or the
/// API cannot be reached.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.globals.config();
    let history = Arc::new(History::new(paths::LOGIN));
    let session = args.globals.session(&config, history)?;

    let previous = session.restore().await;
    debug!(status = ?previous.status(), "session before login");

    let credentials = Credentials::new(&args.email, args.password.expose_secret());
    let user = session.login(&credentials).await?;

    println!("Signed in as {}", describe(&user));
    Ok(())
}
