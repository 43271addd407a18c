//! Saga CLI binary.
//!
//! - `saga serve` runs the story HTTP API
//! - `saga play` tells a story in the terminal

use clap::Parser;
use saga::SagaConfig;
use saga::telemetry::{LogFormat, init_telemetry};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_play, run_serve};

    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_telemetry(cli.verbose, format)?;

    let config = SagaConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            run_serve(config, host, port).await?;
        }

        Commands::Play { theme } => {
            run_play(config, theme).await?;
        }
    }

    Ok(())
}
