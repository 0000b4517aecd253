use clap::{Arg, Command};

pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("open")
                .about("Show what the app would render for a path")
                .arg(
                    Arg::new("path")
                        .help("View path, example: /mesas")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Fetch an API path with the current session")
                .arg(
                    Arg::new("path")
                        .help("API path relative to the base URL, example: /auth/me")
                        .required(true),
                ),
        )
}
