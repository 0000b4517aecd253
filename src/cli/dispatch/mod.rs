use crate::cli::{
    actions::{Action, get, login, open, register, reset_password},
    globals::{GlobalArgs, default_session_file},
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or no session file location
/// can be determined.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    // Closure to return subcommand matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments not found")
    };
    let required = |m: &clap::ArgMatches, id: &str| -> Result<String> {
        m.get_one::<String>(id)
            .cloned()
            .with_context(|| format!("missing required argument: --{id}"))
    };

    match matches.subcommand_name() {
        Some("login") => {
            let m = sub_m("login")?;
            Ok(Action::Login(login::Args {
                globals,
                email: required(m, "email")?,
                password: SecretString::from(required(m, "password")?),
            }))
        }
        Some("register") => {
            let m = sub_m("register")?;
            let password = required(m, "password")?;
            let confirmation = m
                .get_one::<String>("confirm-password")
                .cloned()
                .unwrap_or_else(|| password.clone());
            Ok(Action::Register(register::Args {
                globals,
                name: required(m, "name")?,
                email: required(m, "email")?,
                password: SecretString::from(password),
                confirmation: SecretString::from(confirmation),
                phone: m.get_one::<String>("phone").cloned(),
                auto_login: m.get_flag("auto-login"),
            }))
        }
        Some("logout") => Ok(Action::Logout(globals)),
        Some("whoami") => Ok(Action::WhoAmI(globals)),
        Some("reset-password") => {
            let m = sub_m("reset-password")?;
            Ok(Action::ResetPassword(reset_password::Args {
                globals,
                email: required(m, "email")?,
            }))
        }
        Some("open") => Ok(Action::Open(open::Args {
            globals,
            path: required(sub_m("open")?, "path")?,
        })),
        Some("get") => Ok(Action::Get(get::Args {
            globals,
            path: required(sub_m("get")?, "path")?,
        })),
        Some(other) => Err(anyhow!("unknown command: {other}")),
        None => Err(anyhow!("missing command")),
    }
}

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let session_file = matches
        .get_one::<PathBuf>("session-file")
        .cloned()
        .or_else(default_session_file)
        .context("no default session file location, pass --session-file")?;

    let mut globals = GlobalArgs::new(session_file);
    globals.api_url = matches.get_one::<String>("api-url").cloned();
    globals.timeout_secs = matches.get_one::<u64>("timeout").copied();
    Ok(globals)
}
