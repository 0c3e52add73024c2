pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio CLI - run and manage the portfolio project API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "FOLIO_API_URL",
        default_value = DEFAULT_API_URL,
        help = "Base URL of a running Folio API"
    )]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server in the foreground")]
    Serve,

    #[command(about = "Check server health via the /health endpoint")]
    Health,

    #[command(about = "Bearer token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Project operations against a running server")]
    Projects {
        #[command(subcommand)]
        cmd: commands::projects::ProjectCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve => commands::serve::handle().await,
        Commands::Health => commands::serve::health(&cli.url, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, output_format),
        Commands::Projects { cmd } => commands::projects::handle(cmd, &cli.url, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::projects::ProjectCommands;
    use commands::token::TokenCommands;

    #[test]
    fn parses_token_issue() {
        let cli = Cli::try_parse_from(["folio", "token", "issue", "--subject", "admin", "--hours", "2"]).unwrap();
        match cli.command {
            Commands::Token {
                cmd: TokenCommands::Issue { subject, hours },
            } => {
                assert_eq!(subject, "admin");
                assert_eq!(hours, Some(2));
            }
            _ => panic!("expected token issue"),
        }
    }

    #[test]
    fn parses_project_list_with_query_and_url() {
        let cli = Cli::try_parse_from(["folio", "--url", "http://api:8080", "projects", "list", "--q", "rust"]).unwrap();
        assert_eq!(cli.url, "http://api:8080");
        assert!(matches!(
            cli.command,
            Commands::Projects {
                cmd: ProjectCommands::List { q: Some(ref q) }
            } if q == "rust"
        ));
    }

    #[test]
    fn json_flag_selects_json_output() {
        let cli = Cli::try_parse_from(["folio", "--json", "health"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
    }
}
