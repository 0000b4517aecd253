use crate::{
    cli::globals::GlobalArgs,
    features::auth::PasswordReset,
    routes::{History, paths},
};
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
}

/// Execute the reset-password action.
/// # Errors
/// Returns an error if the email is malformed or the request fails.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.globals.config();
    let history = Arc::new(History::new(paths::RESET_PASSWORD));
    let session = args.globals.session(&config, history)?;
    session.restore().await;

    let reset = PasswordReset::new(&args.email);
    session.request_password_reset(&reset).await?;

    println!("If {} has an account, a reset link is on its way", reset.email());
    Ok(())
}
