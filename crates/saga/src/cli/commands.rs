//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Saga - turn-staged interactive stories
#[derive(Parser, Debug)]
#[command(name = "saga")]
#[command(about = "Turn-staged interactive stories driven by a chat-completion model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the story HTTP API
    Serve {
        /// Interface to bind, overriding the configured host
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play a story in the terminal
    Play {
        /// Story theme; prompted for when omitted
        #[arg(short, long)]
        theme: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_with_overrides() {
        let cli = Cli::parse_from(["saga", "-v", "serve", "--port", "8080"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["saga", "play", "--theme", "sunken city", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Commands::Play { theme } => assert_eq!(theme.as_deref(), Some("sunken city")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
