use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde_json::Value;

/// Thin HTTP client for the project routes
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> anyhow::Result<Value> {
        // 503 still carries a JSON body worth showing
        let response = self.http.get(self.url("/health")).send().await?;
        Ok(response.json().await?)
    }

    pub async fn list(&self, q: Option<&str>) -> anyhow::Result<Value> {
        let mut request = self.http.get(self.url("/api/projects"));
        if let Some(q) = q {
            request = request.query(&[("q", q)]);
        }
        send(request).await
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Value> {
        send(self.http.get(self.url(&format!("/api/projects/{}", id)))).await
    }

    pub async fn create(&self, token: &str, form: multipart::Form) -> anyhow::Result<Value> {
        let request = self
            .http
            .post(self.url("/api/projects"))
            .bearer_auth(token)
            .multipart(form);
        send(request).await
    }

    pub async fn update(&self, token: &str, id: &str, form: multipart::Form) -> anyhow::Result<Value> {
        let request = self
            .http
            .put(self.url(&format!("/api/projects/{}", id)))
            .bearer_auth(token)
            .multipart(form);
        send(request).await
    }

    pub async fn delete(&self, token: &str, id: &str) -> anyhow::Result<Value> {
        let request = self
            .http
            .delete(self.url(&format!("/api/projects/{}", id)))
            .bearer_auth(token);
        send(request).await
    }
}

async fn send(request: RequestBuilder) -> anyhow::Result<Value> {
    let response = request.send().await.context("request failed")?;
    read_json(response).await
}

async fn read_json(response: Response) -> anyhow::Result<Value> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(body);
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    let details = body
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| Some(format!("{}: {}", e.get("field")?.as_str()?, e.get("message")?.as_str()?)))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|d| !d.is_empty());

    match details {
        Some(details) => Err(anyhow!("{} {} ({})", status, message, details)),
        None => Err(anyhow!("{} {}", status, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slash() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.url("/api/projects"), "http://localhost:3000/api/projects");
    }
}
