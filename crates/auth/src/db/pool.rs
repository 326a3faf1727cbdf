//! PostgreSQL connections for the sign-in tables.

use anyhow::{anyhow, Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::info;

use crate::config::{AuthConfig, PoolSettings};

const APPLICATION_NAME: &str = "gatehouse-auth";

/// Opens the pool described by `GATEHOUSE_AUTH_DATABASE_URL` and the pool
/// settings in `config`.
pub async fn connect(config: &AuthConfig) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow!("GATEHOUSE_AUTH_DATABASE_URL is not set"))?;
    connect_url(database_url, &config.pool).await
}

pub async fn connect_url(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let options = connect_options(database_url)?;
    let host = options.get_host().to_owned();

    let pool = PgPoolOptions::new()
        .min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
        .with_context(|| format!("could not reach the sign-in database on {host}"))?;

    info!(%host, max_connections = settings.max_connections, "sign-in database pool ready");
    Ok(pool)
}

/// Round-trips a trivial query through the pool.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .context("sign-in database did not answer a ping")?;
    Ok(())
}

/// Rejects any sslmode weaker than `require`.
fn connect_options(database_url: &str) -> Result<PgConnectOptions> {
    let options = database_url
        .parse::<PgConnectOptions>()
        .context("GATEHOUSE_AUTH_DATABASE_URL is not a valid PostgreSQL URL")?;

    let mode = options.get_ssl_mode();
    if !enforces_tls(mode) {
        return Err(anyhow!(
            "GATEHOUSE_AUTH_DATABASE_URL must use sslmode=require, verify-ca or verify-full (found {mode:?})"
        ));
    }

    Ok(options.application_name(APPLICATION_NAME))
}

fn enforces_tls(mode: PgSslMode) -> bool {
    matches!(mode, PgSslMode::Require | PgSslMode::VerifyCa | PgSslMode::VerifyFull)
}
