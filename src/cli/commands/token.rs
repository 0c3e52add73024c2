use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a bearer token signed with the configured JWT_SECRET")]
    Issue {
        #[arg(long, help = "Subject recorded in the token (who is acting)")]
        subject: String,
        #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { subject, hours } => {
            let config = config::config();
            let hours = hours.unwrap_or(config.security.jwt_expiry_hours);
            let claims = Claims::new(subject, hours)?;
            let token = generate_jwt(&config.security.jwt_secret, &claims)?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "token": token,
                        "subject": claims.sub,
                        "expiresAt": claims.exp,
                    }))?
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}
