use crate::{
    cli::globals::GlobalArgs,
    routes::{History, Outcome, Router, paths},
};
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub path: String,
}

/// Execute the open action: restore the session, then route to `path` and print
/// what would be shown.
/// # Errors
/// Returns an error if the configured API base URL is invalid.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.globals.config();
    let history = Arc::new(History::new(paths::ROOT));
    let session = args.globals.session(&config, history.clone())?;

    let mut router = Router::new(session.store(), history);
    session.restore().await;
    let outcome = router.open(&args.path).await;

    println!("{}", render(&outcome));
    Ok(())
}

fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Rendered(view) => format!("{} ({})", view.title, view.path),
        Outcome::Redirected { from, to } => {
            format!("{from} -> {} ({})", to.path, to.title)
        }
        Outcome::Forbidden(view) => format!("{}: not allowed for this role", view.path),
        Outcome::NotFound => "Not found".to_string(),
    }
}
