mod commands;
mod render;
mod store;
mod transport;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;

use chamasys::api::ApiError;
use chamasys::config::{BASE_URL_VAR, ConfigError, ENFORCE_EXPIRY_VAR, EXPIRY_LEEWAY_VAR};
use chamasys::forms::FieldErrors;
use chamasys::{Access, ApiClient, ClientConfig};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::store::{FileTokenStore, default_token_path};
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `chamasys login` first")]
    NotLoggedIn,
    #[error("this command requires an administrator account")]
    AdminRequired,
    #[error("cannot locate the token file; pass --token-file or set CHAMASYS_TOKEN_FILE")]
    NoTokenFile,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    Validation(FieldErrors),
    #[error("{message}")]
    Api {
        message: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("refusing to delete contribution {0} without --yes")]
    DeleteNotConfirmed(i64),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap an API failure under the user-facing `message`.
    fn api(message: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| {
            tracing::debug!(%source, "api failure");
            Self::Api { message, source }
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "chamasys", about = "ChamaSys contribution tracker CLI")]
struct Cli {
    /// API root, e.g. `http://127.0.0.1:5000`.
    #[arg(long, env = "CHAMASYS_API_URL")]
    base_url: Option<String>,

    /// Token file; defaults to `$HOME/.chamasys/token`.
    #[arg(long, env = "CHAMASYS_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Reject expired tokens before contacting the server.
    #[arg(long, env = "CHAMASYS_ENFORCE_EXPIRY")]
    enforce_expiry: Option<String>,

    /// Seconds of clock skew tolerated when enforcing expiry.
    #[arg(long, env = "CHAMASYS_EXPIRY_LEEWAY_SECS")]
    expiry_leeway: Option<String>,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log requests and session changes to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::from_lookup(|key| match key {
            BASE_URL_VAR => self.base_url.clone(),
            ENFORCE_EXPIRY_VAR => self.enforce_expiry.clone(),
            EXPIRY_LEEWAY_VAR => self.expiry_leeway.clone(),
            _ => None,
        })
    }

    fn token_path(&self) -> Result<PathBuf, CliError> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => default_token_path(std::env::var_os("HOME")).ok_or(CliError::NoTokenFile),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CHAMASYS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a member account.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CHAMASYS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Show who the stored token belongs to.
    Whoami,
    /// List your own contributions.
    Contributions,
    Admin(AdminCommand),
}

impl Command {
    fn access(&self) -> Access {
        match self {
            Self::Login { .. } | Self::Signup { .. } | Self::Logout | Self::Whoami => Access::Public,
            Self::Contributions => Access::Authenticated,
            Self::Admin(_) => Access::AdminOnly,
        }
    }
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    /// List all accounts.
    Users,
    Contributions(ContributionCommand),
}

#[derive(Args, Debug)]
struct ContributionCommand {
    #[command(subcommand)]
    command: ContributionSubcommand,
}

#[derive(Subcommand, Debug)]
enum ContributionSubcommand {
    /// Show the master ledger.
    List,
    /// Record a contribution.
    Add(ContributionArgs),
    /// Replace a contribution's amount, date and member.
    Update {
        id: i64,
        #[command(flatten)]
        fields: ContributionArgs,
    },
    /// Permanently delete a contribution.
    Delete {
        id: i64,
        /// Confirm the deletion.
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct ContributionArgs {
    /// Member user id.
    #[arg(long)]
    member: String,
    #[arg(long)]
    amount: String,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    date: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.client_config()?;
    let store = FileTokenStore::new(cli.token_path()?);
    tracing::debug!(base_url = %config.base_url, token_file = %store.path().display(), "configured");

    let api = ApiClient::new(config, ReqwestTransport::default(), store);
    let report = commands::run(&api, cli.command, commands::now_secs()).await?;
    if cli.json {
        print_json(&report.json)?;
    } else {
        print!("{}", report.text);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
