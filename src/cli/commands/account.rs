use clap::{Arg, ArgAction, Command};

fn email_arg() -> Arg {
    Arg::new("email")
        .short('e')
        .long("email")
        .help("Account email")
        .env("COVER_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new("password")
        .short('p')
        .long("password")
        .help("Account password")
        .env("COVER_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("login")
                .about("Sign in and persist the session")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account")
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Display name, 2 to 100 characters")
                        .required(true),
                )
                .arg(email_arg())
                .arg(password_arg())
                .arg(
                    Arg::new("confirm-password")
                        .long("confirm-password")
                        .help("Password confirmation (defaults to --password)")
                        .env("COVER_PASSWORD_CONFIRM")
                        .hide_env_values(true),
                )
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .help("Optional mobile number, 8 digits starting with 6 or 7"),
                )
                .arg(
                    Arg::new("auto-login")
                        .long("auto-login")
                        .help("Sign in with the token returned by registration")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the persisted session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("reset-password")
                .about("Request a password reset link")
                .arg(email_arg()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_subcommands(Command::new("cover"))
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars(
            [("COVER_EMAIL", None::<&str>), ("COVER_PASSWORD", None::<&str>)],
            || {
                let matches = command().get_matches_from(vec![
                    "cover", "login", "-e", "a@b.com", "-p", "secret123",
                ]);
                let (name, sub) = matches.subcommand().unwrap_or(("", &matches));
                assert_eq!(name, "login");
                assert_eq!(
                    sub.get_one::<String>("email").cloned(),
                    Some("a@b.com".to_string())
                );
                assert_eq!(
                    sub.get_one::<String>("password").cloned(),
                    Some("secret123".to_string())
                );
            },
        );
    }

    #[test]
    fn test_login_reads_credentials_from_env() {
        temp_env::with_vars(
            [
                ("COVER_EMAIL", Some("ana@cover.club")),
                ("COVER_PASSWORD", Some("secret123")),
            ],
            || {
                let matches = command().get_matches_from(vec!["cover", "login"]);
                let sub = matches.subcommand_matches("login");
                assert_eq!(
                    sub.and_then(|m| m.get_one::<String>("email")).cloned(),
                    Some("ana@cover.club".to_string())
                );
            },
        );
    }

    #[test]
    fn test_register_flags() {
        temp_env::with_vars(
            [
                ("COVER_EMAIL", None::<&str>),
                ("COVER_PASSWORD", None::<&str>),
                ("COVER_PASSWORD_CONFIRM", None::<&str>),
            ],
            || {
                let matches = command().get_matches_from(vec![
                    "cover",
                    "register",
                    "--name",
                    "Ana",
                    "--email",
                    "ana@cover.club",
                    "--password",
                    "secret123",
                    "--phone",
                    "70123456",
                    "--auto-login",
                ]);
                let sub = matches.subcommand_matches("register");
                assert_eq!(sub.map(|m| m.get_flag("auto-login")), Some(true));
                assert_eq!(
                    sub.and_then(|m| m.get_one::<String>("phone")).cloned(),
                    Some("70123456".to_string())
                );
                assert!(sub.is_some_and(|m| m.get_one::<String>("confirm-password").is_none()));
            },
        );
    }

    #[test]
    fn test_login_requires_password() {
        temp_env::with_vars(
            [("COVER_EMAIL", None::<&str>), ("COVER_PASSWORD", None::<&str>)],
            || {
                let result =
                    command().try_get_matches_from(vec!["cover", "login", "-e", "a@b.com"]);
                assert!(result.is_err());
            },
        );
    }
}
