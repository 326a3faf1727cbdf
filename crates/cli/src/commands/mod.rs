// CLI subcommand dispatch.

use std::io::{self, Read};

use anyhow::{bail, Context};
use clap::Subcommand;
use gatehouse_auth::{config::AuthConfig, db::pool, store::PgAuthStore};

use crate::output::OutputFormat;

pub mod create_user;
pub mod create_workspace;
pub mod hash_password;
pub mod invite;
pub mod migrate;
pub mod sign_in;

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),
    /// Hash a password read from stdin
    HashPassword(hash_password::HashPasswordArgs),
    /// Create a user account
    CreateUser(create_user::CreateUserArgs),
    /// Create a workspace
    CreateWorkspace(create_workspace::CreateWorkspaceArgs),
    /// Invite an email address to a workspace
    Invite(invite::InviteArgs),
    /// Run a password sign-in against a workspace
    SignIn(sign_in::SignInArgs),
}

pub async fn run(cmd: Command, config: &AuthConfig, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        Command::Migrate(args) => migrate::run(args, config, format).await,
        Command::HashPassword(args) => hash_password::run(args, format),
        Command::CreateUser(args) => create_user::run(args, config, format).await,
        Command::CreateWorkspace(args) => create_workspace::run(args, config, format).await,
        Command::Invite(args) => invite::run(args, config, format).await,
        Command::SignIn(args) => sign_in::run(args, config, format).await,
    }
}

pub(crate) async fn connect_store(config: &AuthConfig) -> anyhow::Result<PgAuthStore> {
    Ok(PgAuthStore::new(pool::connect(config).await?))
}

/// Reads a secret from stdin, dropping the trailing newline.
pub(crate) fn read_secret_from_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("failed to read password from stdin")?;
    let secret = trim_line_ending(&buf);
    if secret.is_empty() {
        bail!("password must not be empty");
    }
    Ok(secret.to_string())
}

fn trim_line_ending(input: &str) -> &str {
    input.strip_suffix('\n').map(|s| s.strip_suffix('\r').unwrap_or(s)).unwrap_or(input)
}
