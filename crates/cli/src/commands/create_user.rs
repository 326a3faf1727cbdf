// `gatehouse create-user`: add an account, optionally with a password.

use clap::Args;
use gatehouse_auth::{config::AuthConfig, password::hash_password};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    /// Account email address.
    #[arg(long)]
    email: String,

    /// Read a password from stdin and store its hash.
    #[arg(long)]
    password_stdin: bool,
}

#[derive(Debug, Serialize)]
struct CreatedUser {
    id: Uuid,
    email: String,
    has_password: bool,
}

pub async fn run(args: CreateUserArgs, config: &AuthConfig, format: OutputFormat) -> anyhow::Result<()> {
    let password_hash = if args.password_stdin {
        Some(hash_password(&super::read_secret_from_stdin()?)?)
    } else {
        None
    };

    let store = super::connect_store(config).await?;
    let user = store.create_user(&args.email, password_hash.as_deref()).await?;
    info!(user_id = %user.id, "user created");

    let created = CreatedUser {
        id: user.id,
        has_password: user.password_hash.is_some(),
        email: user.email,
    };
    output::print_output(format, &created, |u| format!("Created user {} ({})", u.email, u.id))?;
    Ok(())
}
