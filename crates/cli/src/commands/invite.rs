// `gatehouse invite`: create a workspace invitation.

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use gatehouse_auth::config::AuthConfig;
use serde::Serialize;
use uuid::Uuid;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct InviteArgs {
    /// Workspace to invite into.
    #[arg(long)]
    workspace: Uuid,

    /// Invitee email address.
    #[arg(long)]
    email: String,

    /// Hours until the invitation expires. Defaults to the configured expiry.
    #[arg(long)]
    expires_in_hours: Option<u32>,
}

#[derive(Debug, Serialize)]
struct InviteResult {
    invitation_id: Uuid,
    workspace_id: Uuid,
    email: String,
    token: String,
    expires_at: DateTime<Utc>,
}

pub async fn run(args: InviteArgs, config: &AuthConfig, format: OutputFormat) -> anyhow::Result<()> {
    let hours = args.expires_in_hours.unwrap_or(config.invite_expiry_hours);
    if hours == 0 {
        anyhow::bail!("--expires-in-hours must be greater than zero");
    }

    let store = super::connect_store(config).await?;
    store
        .get_workspace(args.workspace)
        .await?
        .ok_or_else(|| anyhow!("workspace {} not found", args.workspace))?;

    let (invitation, token) = store
        .create_invitation(args.workspace, &args.email, Duration::hours(i64::from(hours)))
        .await?;

    let result = InviteResult {
        invitation_id: invitation.id,
        workspace_id: invitation.workspace_id,
        email: invitation.email,
        token,
        expires_at: invitation.expires_at,
    };
    output::print_output(format, &result, |r| {
        format!("Invited {} (expires {})\ntoken: {}", r.email, r.expires_at.to_rfc3339(), r.token)
    })?;
    Ok(())
}
