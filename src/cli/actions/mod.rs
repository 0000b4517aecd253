pub mod get;
pub mod login;
pub mod logout;
pub mod open;
pub mod register;
pub mod reset_password;
pub mod whoami;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Register(register::Args),
    Logout(GlobalArgs),
    WhoAmI(GlobalArgs),
    ResetPassword(reset_password::Args),
    Open(open::Args),
    Get(get::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
