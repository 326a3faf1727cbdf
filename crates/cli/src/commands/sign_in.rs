// `gatehouse sign-in`: password sign-in against a workspace.

use std::sync::Arc;

use anyhow::anyhow;
use clap::Args;
use gatehouse_auth::{config::AuthConfig, token::LoginTokenService, AuthService};
use gatehouse_common::types::Credentials;
use serde::Serialize;
use uuid::Uuid;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SignInArgs {
    /// Workspace to sign in to.
    #[arg(long)]
    workspace: Uuid,

    /// Account email address. The password is read from stdin.
    #[arg(long)]
    email: String,
}

#[derive(Debug, Serialize)]
struct SignInResult {
    user_id: Uuid,
    email: String,
    workspace_id: Uuid,
    login_token: String,
    expires_in_seconds: i64,
}

pub async fn run(args: SignInArgs, config: &AuthConfig, format: OutputFormat) -> anyhow::Result<()> {
    let password = super::read_secret_from_stdin()?;
    let store = super::connect_store(config).await?;
    let workspace = store
        .get_workspace(args.workspace)
        .await?
        .ok_or_else(|| anyhow!("workspace {} not found", args.workspace))?;

    let tokens = LoginTokenService::new(&config.token_secret, config.login_token_ttl_seconds)?;
    let service = AuthService::with_store(Arc::new(store), tokens, config.password_auth_enabled);

    let grant = service
        .sign_in_with_password(&Credentials::new(args.email, password), &workspace)
        .await?;

    let result = SignInResult {
        user_id: grant.user.id,
        email: grant.user.email,
        workspace_id: grant.workspace_id,
        login_token: grant.login_token,
        expires_in_seconds: grant.expires_in_seconds,
    };
    output::print_output(format, &result, |r| {
        format!(
            "Signed in as {} (token expires in {}s)\n{}",
            r.email, r.expires_in_seconds, r.login_token
        )
    })?;
    Ok(())
}
