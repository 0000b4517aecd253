mod account;
mod navigation;

use clap::{
    Arg, ColorChoice, Command,
    builder::{
        ValueParser,
        styling::{AnsiColor, Effects, Styles},
    },
};
use std::path::PathBuf;

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("cover")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("API base URL, example: https://api.cover.club/api")
                .long_help(
                    "API base URL. Overrides COVER_API_BASE_URL and the build-time default.",
                )
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Request timeout in seconds")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("File holding the persisted session")
                .env("COVER_SESSION_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("COVER_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        );

    let command = account::with_subcommands(command);
    navigation::with_subcommands(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "cover");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = new().get_matches_from(vec![
            "cover",
            "whoami",
            "--api-url",
            "https://api.cover.club/api",
            "--timeout",
            "5",
            "--session-file",
            "/tmp/cover-session.json",
        ]);

        assert_eq!(matches.subcommand_name(), Some("whoami"));
        assert_eq!(
            matches.get_one::<String>("api-url").cloned(),
            Some("https://api.cover.club/api".to_string())
        );
        assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(5));
        assert_eq!(
            matches.get_one::<PathBuf>("session-file").cloned(),
            Some(PathBuf::from("/tmp/cover-session.json"))
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = new().try_get_matches_from(vec!["cover", "--timeout", "0", "whoami"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        temp_env::with_vars([("COVER_LOG_LEVEL", None::<String>)], || {
            assert!(new().try_get_matches_from(vec!["cover"]).is_err());
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("COVER_SESSION_FILE", Some("/tmp/env-session.json")),
                ("COVER_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["cover", "logout"]);
                assert_eq!(
                    matches.get_one::<PathBuf>("session-file").cloned(),
                    Some(PathBuf::from("/tmp/env-session.json"))
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("COVER_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["cover", "logout"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("COVER_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["cover".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }
                args.push("logout".to_string());

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
