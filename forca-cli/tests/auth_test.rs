use anyhow::Result;
use forca_cli::backend::{BackendClient, BackendError, SignUpOutcome};
use forca_cli::config::Config;
use forca_cli::session::{AuthContext, AuthState};
use mockito::{Matcher, Server};
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

const USER_ID: &str = "0b6d1f4e-7c55-4a41-9a40-2a2b0c7c2f11";

fn config_for(server: &Server, file: &Path) -> Config {
    let mut config = Config::default().with_path(file);
    config.backend.url = server.url();
    config.backend.anon_key = "anon-key".to_string();
    config
}

fn session_body(access_token: &str) -> String {
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-token",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": {
            "id": USER_ID,
            "email": "ana@example.com",
            "user_metadata": { "username": "ana" }
        }
    })
    .to_string()
}

fn user_body() -> String {
    json!({
        "id": USER_ID,
        "email": "ana@example.com",
        "user_metadata": { "username": "ana" }
    })
    .to_string()
}

#[tokio::test]
async fn test_sign_in_stores_session() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;
    let file = dir.path().join("config.toml");

    let mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .match_header("apikey", "anon-key")
        .match_body(Matcher::Json(json!({
            "email": "ana@example.com",
            "password": "secret1"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_body("access-token"))
        .create_async()
        .await;

    let auth = AuthContext::new(BackendClient::new(config_for(&server, &file))?);
    let mut rx = auth.subscribe();

    let user = auth.sign_in("ana@example.com", "secret1").await?;
    mock.assert_async().await;

    assert_eq!(user.username.as_deref(), Some("ana"));
    assert!(matches!(*rx.borrow_and_update(), AuthState::SignedIn(_)));
    assert_eq!(auth.client().access_token().as_deref(), Some("access-token"));

    // The session survives a restart
    let saved = Config::load_from(Some(file.as_path()))?;
    assert!(saved.is_authenticated());
    assert_eq!(saved.auth.user_id, USER_ID);
    assert_eq!(saved.auth.username, "ana");
    assert!(saved.auth.expires_at > 0);

    Ok(())
}

#[tokio::test]
async fn test_sign_in_with_wrong_password() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;

    server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
        .create_async()
        .await;

    let auth = AuthContext::new(BackendClient::new(config_for(
        &server,
        &dir.path().join("config.toml"),
    ))?);

    let err = auth.sign_in("ana@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, BackendError::AuthenticationFailed(ref m) if m == "Invalid login credentials"));
    assert_eq!(auth.state(), AuthState::Loading);
    assert!(!auth.client().has_session());

    Ok(())
}

#[tokio::test]
async fn test_restore_refreshes_rejected_token() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;
    let file = dir.path().join("config.toml");

    let mut config = config_for(&server, &file);
    config.auth.access_token = "stale-token".to_string();
    config.auth.refresh_token = "refresh-token".to_string();

    let rejected = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer stale-token")
        .with_status(401)
        .with_body(r#"{"msg":"JWT expired"}"#)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
        .match_body(Matcher::Json(json!({ "refresh_token": "refresh-token" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_body("fresh-token"))
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer fresh-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body())
        .create_async()
        .await;

    let auth = AuthContext::new(BackendClient::new(config)?);
    let state = auth.restore().await;

    rejected.assert_async().await;
    refresh.assert_async().await;
    accepted.assert_async().await;

    let user = state.user().expect("signed in");
    assert_eq!(user.id.to_string(), USER_ID);
    assert_eq!(auth.client().access_token().as_deref(), Some("fresh-token"));

    Ok(())
}

#[tokio::test]
async fn test_restore_with_revoked_session_signs_out() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;
    let file = dir.path().join("config.toml");

    let mut config = config_for(&server, &file);
    config.auth.access_token = "stale-token".to_string();
    config.auth.refresh_token = "revoked".to_string();

    server
        .mock("GET", "/auth/v1/user")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#)
        .create_async()
        .await;

    config.save()?;

    let auth = AuthContext::new(BackendClient::new(config)?);
    assert_eq!(auth.restore().await, AuthState::SignedOut);
    assert!(auth.require_user().is_err());

    // The dead tokens are gone, in memory and on disk
    assert!(!auth.client().has_session());
    assert!(auth.client().access_token().is_none());
    let saved = Config::load_from(Some(file.as_path()))?;
    assert!(!saved.is_authenticated());
    assert!(saved.auth.refresh_token.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_refresh_outage_keeps_session() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;

    let mut config = config_for(&server, &dir.path().join("config.toml"));
    config.auth.access_token = "stale-token".to_string();
    config.auth.refresh_token = "refresh-token".to_string();

    server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(r#"{"message":"upstream unavailable"}"#)
        .create_async()
        .await;

    let client = BackendClient::new(config)?;
    assert!(client.refresh_session().await.is_err());
    assert!(client.has_session());

    Ok(())
}

#[tokio::test]
async fn test_session_save_leaves_file_endpoints_alone() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        "[backend]\nurl = \"https://file.example\"\nanon_key = \"file-key\"\n",
    )?;

    server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::Any)
        .match_header("apikey", "env-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_body("access-token"))
        .create_async()
        .await;

    let mut config = Config::load_from(Some(file.as_path()))?;
    let url = server.url();
    config.apply_overrides(|key| match key {
        "FORCA_SUPABASE_URL" => Some(url.clone()),
        "FORCA_SUPABASE_ANON_KEY" => Some("env-key".to_string()),
        _ => None,
    });

    let auth = AuthContext::new(BackendClient::new(config)?);
    auth.sign_in("ana@example.com", "secret1").await?;

    let written: Config = toml::from_str(&std::fs::read_to_string(&file)?)?;
    assert_eq!(written.backend.url, "https://file.example");
    assert_eq!(written.backend.anon_key, "file-key");
    assert_eq!(written.auth.access_token, "access-token");

    Ok(())
}

#[tokio::test]
async fn test_sign_out_clears_session_even_when_remote_fails() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;
    let file = dir.path().join("config.toml");

    let mut config = config_for(&server, &file);
    config.auth.access_token = "access-token".to_string();
    config.auth.refresh_token = "refresh-token".to_string();
    config.save()?;

    let logout = server
        .mock("POST", "/auth/v1/logout")
        .match_header("authorization", "Bearer access-token")
        .with_status(500)
        .create_async()
        .await;

    let auth = AuthContext::new(BackendClient::new(config)?);
    auth.sign_out().await?;
    logout.assert_async().await;

    assert_eq!(auth.state(), AuthState::SignedOut);
    assert!(!Config::load_from(Some(file.as_path()))?.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn test_sign_up_pending_confirmation() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;

    let mock = server
        .mock("POST", "/auth/v1/signup")
        .match_body(Matcher::PartialJson(json!({
            "email": "ana@example.com",
            "data": { "username": "ana" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body())
        .create_async()
        .await;

    let auth = AuthContext::new(BackendClient::new(config_for(
        &server,
        &dir.path().join("config.toml"),
    ))?);

    let outcome = auth.sign_up("ana@example.com", "secret1", "ana").await?;
    mock.assert_async().await;

    assert!(matches!(outcome, SignUpOutcome::ConfirmationPending(_)));
    assert!(auth.user().is_none());
    assert!(!auth.client().has_session());

    Ok(())
}

#[tokio::test]
async fn test_password_recovery_flow() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = tempdir()?;

    let mut config = config_for(&server, &dir.path().join("config.toml"));
    config.backend.password_reset_redirect = Some("forca://reset-password".to_string());

    let recover = server
        .mock("POST", "/auth/v1/recover")
        .match_query(Matcher::UrlEncoded(
            "redirect_to".into(),
            "forca://reset-password".into(),
        ))
        .match_body(Matcher::Json(json!({ "email": "ana@example.com" })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/auth/v1/user")
        .match_header("authorization", "Bearer recovery-token")
        .match_body(Matcher::Json(json!({ "password": "new-secret" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body())
        .create_async()
        .await;

    let auth = AuthContext::new(BackendClient::new(config)?);
    auth.reset_password("ana@example.com").await?;
    let user = auth
        .update_password("new-secret", Some("recovery-token"))
        .await?;

    recover.assert_async().await;
    update.assert_async().await;
    assert_eq!(user.email.as_deref(), Some("ana@example.com"));

    Ok(())
}

#[tokio::test]
async fn test_update_password_needs_session_or_token() -> Result<()> {
    let server = Server::new_async().await;
    let dir = tempdir()?;

    let auth = AuthContext::new(BackendClient::new(config_for(
        &server,
        &dir.path().join("config.toml"),
    ))?);

    let err = auth.update_password("new-secret", None).await.unwrap_err();
    assert!(matches!(err, BackendError::NotAuthenticated));

    Ok(())
}
