// gatehouse operator CLI entry point.

use clap::Parser;
use gatehouse_auth::{config::AuthConfig, telemetry};

mod commands;
mod exit_code;
mod output;

#[derive(Parser)]
#[command(name = "gatehouse", about = "Workspace sign-in administration")]
struct Cli {
    /// Force JSON output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = output::OutputFormat::detect(cli.json);
    let config = AuthConfig::from_env();

    if let Err(error) = telemetry::init(&config) {
        output::print_anyhow_error(format, &error);
        std::process::exit(exit_code::ExitCode::Usage.code());
    }

    if config.is_dev_token_secret() {
        tracing::warn!("using the development login token secret");
    }

    if let Err(error) = commands::run(cli.command, &config, format).await {
        output::print_anyhow_error(format, &error);
        std::process::exit(exit_code::ExitCode::from_error(&error).code());
    }
}
