use crate::cli::actions::{
    Action, get, login, logout, open, register, reset_password, whoami,
};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::Logout(globals) => logout::execute(&globals),
        Action::WhoAmI(globals) => whoami::execute(&globals).await,
        Action::ResetPassword(args) => reset_password::execute(args).await,
        Action::Open(args) => open::execute(args).await,
        Action::Get(args) => get::execute(args).await,
    }
}
