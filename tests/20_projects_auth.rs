mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_requires_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let body = json!({
        "title": "Unauthorized attempt",
        "description": "This project must never be stored"
    });

    let res = client.post(server.url("/api/projects")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(server.url("/api/projects"))
        .bearer_auth("not-a-real-token")
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let error = res.json::<Value>().await?;
    assert!(error["message"].is_string());

    let found = client
        .get(server.url("/api/projects"))
        .query(&[("q", "Unauthorized attempt")])
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let forged = folio_api::auth::generate_jwt(
        "some-other-secret",
        &folio_api::auth::Claims::new("intruder", 1)?,
    )?;

    let res = client
        .post(server.url("/api/projects"))
        .bearer_auth(forged)
        .json(&json!({ "title": "Forged", "description": "Signed with the wrong key" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_require_token_and_leave_record_intact() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let created = common::create_project(
        &client,
        server,
        json!({ "title": "Guarded", "description": "Protected from anonymous writes" }),
    )
    .await?;
    let path = format!("/api/projects/{}", created["id"].as_str().unwrap_or_default());

    let res = client
        .put(server.url(&path))
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.delete(server.url(&path)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let current = client.get(server.url(&path)).send().await?.json::<Value>().await?;
    assert_eq!(current["title"], "Guarded");
    Ok(())
}

#[tokio::test]
async fn unauthorized_wins_over_bad_input() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Malformed id and invalid body, but no token: auth is checked first
    let res = client
        .put(server.url("/api/projects/not-an-id"))
        .json(&json!({ "title": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
