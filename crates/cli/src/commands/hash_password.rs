// `gatehouse hash-password`: print an argon2id PHC string.

use clap::Args;
use gatehouse_auth::password::hash_password;
use serde::Serialize;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct HashPasswordArgs {}

#[derive(Debug, Serialize)]
struct HashResult {
    password_hash: String,
}

pub fn run(_args: HashPasswordArgs, format: OutputFormat) -> anyhow::Result<()> {
    let password = super::read_secret_from_stdin()?;
    let password_hash = hash_password(&password)?;

    output::print_output(format, &HashResult { password_hash }, |r| r.password_hash.clone())?;
    Ok(())
}
