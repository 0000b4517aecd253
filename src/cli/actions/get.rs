use crate::{
    cli::globals::GlobalArgs,
    routes::{History, Navigator, paths},
};
use anyhow::{Result, bail};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub path: String,
}

/// Execute the get action and print the JSON response.
/// # Errors
/// Returns an error if there is no session or the request fails.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.globals.config();
    let history = Arc::new(History::new(paths::DASHBOARD));
    let session = args.globals.session(&config, history.clone())?;

    let current = session.restore().await;
    if !current.is_authenticated() {
        bail!("Not signed in, run `cover login` first");
    }

    match session.gateway().get_json::<Value>(&args.path).await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(err) if err.is_auth() && history.current_path() == paths::LOGIN => {
            bail!("Session expired ({}), run `cover login` again", err.message())
        }
        Err(err) => Err(err.into()),
    }
}
