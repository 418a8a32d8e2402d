//! Command execution against the API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every command first runs the same route guard the web client runs on
//! navigation: member commands need a decodable token, `admin` commands an
//! admin token. A rejected token is cleared from the token file before the
//! command fails, so the next invocation starts clean.
//!
//! Commands are generic over the transport and token store so tests can
//! drive them with a scripted fake and an in-memory store.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::time::{SystemTime, UNIX_EPOCH};

use chamasys::api::{
    DELETE_FAILED_MESSAGE, LOAD_FAILED_MESSAGE, SAVE_FAILED_MESSAGE, SIGNUP_SUCCESS_MESSAGE,
};
use chamasys::forms::{ContributionForm, LoginForm, SignupForm};
use chamasys::{ApiClient, GuardOutcome, SessionState, TokenStore, Transport};
use futures_util::future::try_join;
use serde_json::{Value, json};

use crate::{AdminSubcommand, CliError, Command, ContributionArgs, ContributionSubcommand, render};

/// Command result in both output formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub json: Value,
    pub text: String,
}

impl Report {
    fn new(json: Value, text: impl Into<String>) -> Self {
        let mut text = text.into();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Self { json, text }
    }
}

pub fn now_secs() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

fn contribution_form(args: ContributionArgs) -> ContributionForm {
    ContributionForm { amount: args.amount, date: args.date, user_id: args.member }
}

fn session_json(state: &SessionState) -> Value {
    let claims = state.claims();
    json!({
        "authenticated": state.is_authenticated(),
        "is_admin": state.is_admin(),
        "user_id": claims.and_then(chamasys::Claims::user_id),
        "username": claims.and_then(chamasys::Claims::username),
    })
}

/// Run `command` after the route guard admits it.
pub async fn run<T, S>(api: &ApiClient<T, S>, command: Command, now: i64) -> Result<Report, CliError>
where
    T: Transport,
    S: TokenStore,
{
    match api.session().check(command.access(), now) {
        GuardOutcome::Render(_) => {}
        GuardOutcome::RedirectLogin => return Err(CliError::NotLoggedIn),
        GuardOutcome::RedirectDefault => return Err(CliError::AdminRequired),
    }

    match command {
        Command::Login { username, password } => {
            let request = LoginForm { username, password }.validate().map_err(CliError::Validation)?;
            let landing = api
                .sign_in(&request, now)
                .await
                .map_err(|source| CliError::api(source.login_message())(source))?;
            let state = api.session().state(now);
            let mut json = session_json(&state);
            json["landing"] = Value::from(landing.path());
            Ok(Report::new(json, render::whoami(&state)))
        }
        Command::Signup { username, email, password, confirm_password } => {
            let request = SignupForm { username, email, password, confirm_password }
                .validate()
                .map_err(CliError::Validation)?;
            api.signup(&request)
                .await
                .map_err(|source| CliError::api(source.signup_message())(source))?;
            Ok(Report::new(json!({ "message": SIGNUP_SUCCESS_MESSAGE }), SIGNUP_SUCCESS_MESSAGE))
        }
        Command::Logout => {
            api.session().logout();
            Ok(Report::new(json!({ "authenticated": false }), "Logged out."))
        }
        Command::Whoami => {
            let state = api.session().state(now);
            Ok(Report::new(session_json(&state), render::whoami(&state)))
        }
        Command::Contributions => {
            let contributions = api.my_contributions().await.map_err(CliError::api(LOAD_FAILED_MESSAGE))?;
            Ok(Report::new(serde_json::to_value(&contributions)?, render::member_ledger(&contributions)))
        }
        Command::Admin(admin) => run_admin(api, admin.command).await,
    }
}

async fn run_admin<T, S>(api: &ApiClient<T, S>, command: AdminSubcommand) -> Result<Report, CliError>
where
    T: Transport,
    S: TokenStore,
{
    let AdminSubcommand::Contributions(contributions) = command else {
        let users = api.users().await.map_err(CliError::api(LOAD_FAILED_MESSAGE))?;
        return Ok(Report::new(serde_json::to_value(&users)?, render::users(&users)));
    };

    match contributions.command {
        ContributionSubcommand::List => {
            let (users, contributions) = try_join(api.users(), api.all_contributions())
                .await
                .map_err(CliError::api(LOAD_FAILED_MESSAGE))?;
            let json = json!({ "users": users, "contributions": contributions });
            Ok(Report::new(json, render::admin_ledger(&users, &contributions)))
        }
        ContributionSubcommand::Add(args) => {
            let payload = contribution_form(args).validate().map_err(CliError::Validation)?;
            let created = api.create_contribution(&payload).await.map_err(CliError::api(SAVE_FAILED_MESSAGE))?;
            tracing::info!(id = created.id, "contribution recorded");
            Ok(Report::new(serde_json::to_value(&created)?, render::saved("Recorded", &created)))
        }
        ContributionSubcommand::Update { id, fields } => {
            let payload = contribution_form(fields).validate().map_err(CliError::Validation)?;
            let updated =
                api.update_contribution(id, &payload).await.map_err(CliError::api(SAVE_FAILED_MESSAGE))?;
            tracing::info!(id, "contribution updated");
            Ok(Report::new(serde_json::to_value(&updated)?, render::saved("Updated", &updated)))
        }
        ContributionSubcommand::Delete { id, yes } => {
            if !yes {
                return Err(CliError::DeleteNotConfirmed(id));
            }
            let reply = api.delete_contribution(id).await.map_err(CliError::api(DELETE_FAILED_MESSAGE))?;
            tracing::info!(id, "contribution deleted");
            let text = reply.message.clone().unwrap_or_else(|| format!("Deleted contribution #{id}."));
            Ok(Report::new(serde_json::to_value(&reply)?, text))
        }
    }
}
