// `gatehouse migrate`: apply sign-in schema migrations.

use clap::Args;
use gatehouse_auth::{config::AuthConfig, db::migrations::run_migrations};
use serde::Serialize;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct MigrateArgs {}

#[derive(Debug, Serialize)]
struct MigrateResult {
    applied: bool,
}

pub async fn run(_args: MigrateArgs, config: &AuthConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = super::connect_store(config).await?;
    run_migrations(store.pool()).await?;

    output::print_output(format, &MigrateResult { applied: true }, |_| {
        "Migrations applied.".to_string()
    })?;
    Ok(())
}
