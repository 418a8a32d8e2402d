use chamasys::ExpiryPolicy;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("chamasys").chain(args.iter().copied())).unwrap()
}

#[test]
fn flags_build_client_config() {
    let cli = parse(&[
        "--base-url",
        "https://chama.example.org/",
        "--enforce-expiry",
        "yes",
        "--expiry-leeway",
        "60",
        "whoami",
    ]);
    let config = cli.client_config().unwrap();
    assert_eq!(config.base_url, "https://chama.example.org");
    assert_eq!(config.expiry, ExpiryPolicy::Enforce { leeway_secs: 60 });
}

#[test]
fn bad_flag_values_are_config_errors() {
    let cli = parse(&["--base-url", "chama.example.org", "whoami"]);
    assert!(matches!(cli.client_config(), Err(ConfigError::InvalidBaseUrl(_))));

    let cli = parse(&["--base-url", "http://localhost", "--enforce-expiry", "maybe", "whoami"]);
    assert!(matches!(cli.client_config(), Err(ConfigError::InvalidBool { .. })));
}

#[test]
fn explicit_token_file_wins() {
    let cli = parse(&["--token-file", "/tmp/chamasys-token", "logout"]);
    assert_eq!(cli.token_path().unwrap(), PathBuf::from("/tmp/chamasys-token"));
}

#[test]
fn commands_declare_required_access() {
    assert_eq!(parse(&["login", "--username", "amy", "--password", "secret1"]).command.access(), Access::Public);
    assert_eq!(parse(&["whoami"]).command.access(), Access::Public);
    assert_eq!(parse(&["contributions"]).command.access(), Access::Authenticated);
    assert_eq!(parse(&["admin", "users"]).command.access(), Access::AdminOnly);
    assert_eq!(parse(&["admin", "contributions", "list"]).command.access(), Access::AdminOnly);
}

#[test]
fn contribution_subcommands_parse() {
    let cli = parse(&["admin", "contributions", "update", "3", "--member", "2", "--amount", "80", "--date", "2024-03-06"]);
    let Command::Admin(AdminCommand { command: AdminSubcommand::Contributions(ContributionCommand { command }) }) =
        cli.command
    else {
        panic!("expected admin contributions command");
    };
    let ContributionSubcommand::Update { id, fields } = command else {
        panic!("expected update");
    };
    assert_eq!(id, 3);
    assert_eq!(fields.member, "2");

    let cli = parse(&["admin", "contributions", "delete", "3", "--yes", "--json"]);
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Command::Admin(AdminCommand {
            command: AdminSubcommand::Contributions(ContributionCommand {
                command: ContributionSubcommand::Delete { id: 3, yes: true }
            })
        })
    ));
}

#[test]
fn api_errors_display_user_message() {
    let err = CliError::api("Could not load contributions. Please try again.")(ApiError::Transport("refused".into()));
    assert_eq!(err.to_string(), "Could not load contributions. Please try again.");
    assert!(std::error::Error::source(&err).is_some());
}
