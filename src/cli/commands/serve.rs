use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::{config, server};

pub async fn handle() -> anyhow::Result<()> {
    let config = config::config().clone();
    tracing::info!("Starting Folio API in {:?} mode", config.environment);
    server::serve(config).await
}

pub async fn health(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(url)?;
    let body = client.health().await?;
    let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("unknown").to_string();

    output_success(output_format, &format!("{} is {}", url, status), Some(body))
}
