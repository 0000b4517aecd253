use crate::{
    app_lib::RegisterMode,
    cli::{actions::whoami::describe, globals::GlobalArgs},
    features::auth::{RegisterOutcome, Registration},
    routes::{History, paths},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirmation: SecretString,
    pub phone: Option<String>,
    pub auto_login: bool,
}

/// Execute the register action.
/// # Errors
/// Returns an error if the input is invalid or the API refuses the registration.
pub async fn execute(args: Args) -> Result<()> {
    let mut config = args.globals.config();
    if args.auto_login {
        config = config.with_register_mode(RegisterMode::AutoLogin);
    }
    let history = Arc::new(History::new(paths::REGISTER));
    let session = args.globals.session(&config, history)?;
    session.restore().await;

    let mut registration = Registration::new(
        &args.name,
        &args.email,
        args.password.expose_secret(),
        args.confirmation.expose_secret(),
    );
    if let Some(phone) = &args.phone {
        registration = registration.with_phone(phone);
    }

    match session.register(&registration).await? {
        RegisterOutcome::Authenticated(user) => {
            println!("Registered and signed in as {}", describe(&user));
        }
        RegisterOutcome::Registered => {
            println!("Account created for {}, sign in with `cover login`", registration.email());
        }
    }

    Ok(())
}
