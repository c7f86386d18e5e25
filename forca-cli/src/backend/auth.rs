use chrono::Utc;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{BackendClient, BackendError, PreparedRequest};
use crate::config::StoredSession;

const AUTH_PATH: &str = "/auth/v1";

/// User record as returned by the auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    /// Username chosen at registration
    pub fn username(&self) -> Option<&str> {
        self.user_metadata
            .get("username")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
    }
}

/// Tokens issued on sign-in, sign-up or refresh
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Absolute expiry, from the response or derived from `expires_in`
    pub fn expiry(&self) -> i64 {
        self.expires_at
            .or_else(|| self.expires_in.map(|secs| Utc::now().timestamp() + secs))
            .unwrap_or(0)
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at: self.expiry(),
            user_id: self.user.id.to_string(),
            email: self.user.email.clone().unwrap_or_default(),
            username: self.user.username().unwrap_or_default().to_string(),
        }
    }
}

/// Sign-up answers with a session when the account is confirmed right away,
/// or with the bare user when an email confirmation is pending
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    Session(Session),
    ConfirmationPending(AuthUser),
}

impl SignUpOutcome {
    pub fn user(&self) -> &AuthUser {
        match self {
            SignUpOutcome::Session(session) => &session.user,
            SignUpOutcome::ConfirmationPending(user) => user,
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl BackendClient {
    fn auth_path(endpoint: &str) -> String {
        format!("{}{}", AUTH_PATH, endpoint)
    }

    pub(crate) fn store_session(&self, session: &Session) -> Result<(), BackendError> {
        let mut config = self.lock();
        config.set_session(session.to_stored());
        Self::persist(&config)
    }

    pub(crate) fn clear_session(&self) -> Result<(), BackendError> {
        let mut config = self.lock();
        config.clear_session();
        Self::persist(&config)
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        tracing::debug!("Signing in as {}", email);

        let response = self
            .anon_request(Method::POST, &Self::auth_path("/token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let session: Session = Self::decode(response)
            .await
            .map_err(BackendError::into_auth_failure)?;

        self.store_session(&session)?;

        tracing::info!("Successfully signed in as {}", email);
        Ok(session)
    }

    /// Register a new account; the username travels in the user metadata
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        tracing::debug!("Registering {}", email);

        let body = json!({
            "email": email,
            "password": password,
            "data": { "username": username },
        });

        let response = self
            .anon_request(Method::POST, &Self::auth_path("/signup"))
            .json(&body)
            .send()
            .await?;

        let outcome: SignUpOutcome = Self::decode(response)
            .await
            .map_err(BackendError::into_auth_failure)?;

        if let SignUpOutcome::Session(session) = &outcome {
            self.store_session(session)?;
        }

        tracing::info!("Registered {}", email);
        Ok(outcome)
    }

    /// Sign out remotely and drop the local session. The local session is
    /// cleared even when the remote call fails.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        if let Some(token) = self.access_token() {
            let result = self
                .anon_request(Method::POST, &Self::auth_path("/logout"))
                .bearer_auth(token)
                .send()
                .await;

            match result {
                Ok(response) => {
                    if let Err(e) = Self::expect_success(response).await {
                        tracing::warn!("Remote sign-out failed: {}", e);
                    }
                }
                Err(e) => tracing::warn!("Remote sign-out failed: {}", e),
            }
        }

        self.clear_session()?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Ask the service to email a password recovery link
    pub async fn reset_password_for_email(&self, email: &str) -> Result<(), BackendError> {
        let redirect = self.lock().backend.password_reset_redirect.clone();

        let mut request = self
            .anon_request(Method::POST, &Self::auth_path("/recover"))
            .json(&json!({ "email": email }));

        if let Some(redirect) = redirect.filter(|r| !r.is_empty()) {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let response = request.send().await?;
        Self::expect_success(response).await?;

        tracing::info!("Password recovery requested for {}", email);
        Ok(())
    }

    /// Change the password. A recovery token (from the reset email) takes the
    /// place of the stored session when given.
    pub async fn update_password(
        &self,
        new_password: &str,
        recovery_token: Option<&str>,
    ) -> Result<AuthUser, BackendError> {
        let body = json!({ "password": new_password });

        let response = match recovery_token {
            Some(token) => {
                self.anon_request(Method::PUT, &Self::auth_path("/user"))
                    .bearer_auth(token)
                    .json(&body)
                    .send()
                    .await?
            }
            None => {
                if !self.has_session() {
                    return Err(BackendError::NotAuthenticated);
                }
                self.send(PreparedRequest::new(Method::PUT, Self::auth_path("/user")).json(body))
                    .await?
            }
        };

        let user: AuthUser = Self::decode(response).await?;
        tracing::info!("Password updated for {}", user.id);
        Ok(user)
    }

    /// Fetch the signed-in user
    pub async fn current_user(&self) -> Result<AuthUser, BackendError> {
        if !self.has_session() {
            return Err(BackendError::NotAuthenticated);
        }

        let response = self
            .send(PreparedRequest::new(Method::GET, Self::auth_path("/user")))
            .await?;

        let user: AuthUser = Self::decode(response).await?;
        tracing::debug!("Retrieved user {}", user.id);
        Ok(user)
    }

    /// Exchange the refresh token for a new session and store it. A rejected
    /// refresh token signs the user out.
    pub async fn refresh_session(&self) -> Result<Session, BackendError> {
        let refresh_token = {
            let config = self.lock();
            if config.auth.refresh_token.is_empty() {
                return Err(BackendError::NotAuthenticated);
            }
            config.auth.refresh_token.clone()
        };

        tracing::debug!("Refreshing access token");

        let response = self
            .anon_request(Method::POST, &Self::auth_path("/token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;

        let session: Session = match Self::decode(response).await {
            Ok(session) => session,
            Err(e) => {
                let e = e.into_auth_failure();
                if matches!(e, BackendError::AuthenticationFailed(_)) {
                    tracing::warn!("Refresh token rejected, clearing stored session: {}", e);
                    self.clear_session()?;
                }
                return Err(e);
            }
        };

        self.store_session(&session)?;

        tracing::info!("Successfully refreshed access token");
        Ok(session)
    }
}
