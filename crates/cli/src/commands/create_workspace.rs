// `gatehouse create-workspace`: add a workspace to sign in to.

use clap::Args;
use gatehouse_auth::config::AuthConfig;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct CreateWorkspaceArgs {
    /// Display name.
    #[arg(long)]
    name: String,

    /// Reject email/password sign-in for this workspace.
    #[arg(long)]
    no_password_auth: bool,
}

#[derive(Debug, Serialize)]
struct CreatedWorkspace {
    id: Uuid,
    name: String,
    is_password_auth_enabled: bool,
}

pub async fn run(
    args: CreateWorkspaceArgs,
    config: &AuthConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        anyhow::bail!("--name must not be empty");
    }

    let store = super::connect_store(config).await?;
    let workspace = store.create_workspace(name, !args.no_password_auth).await?;
    info!(workspace_id = %workspace.id, "workspace created");

    let created = CreatedWorkspace {
        id: workspace.id,
        name: name.to_owned(),
        is_password_auth_enabled: workspace.is_password_auth_enabled,
    };
    output::print_output(format, &created, |w| {
        let password = if w.is_password_auth_enabled { "enabled" } else { "disabled" };
        format!("Created workspace {} ({}), password sign-in {password}", w.name, w.id)
    })?;
    Ok(())
}
