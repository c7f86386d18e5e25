//! Authentication state shared by the commands and the dashboard.

use tokio::sync::watch;
use uuid::Uuid;

use crate::backend::{AuthUser, BackendClient, BackendError, SignUpOutcome};

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl User {
    /// Username if set, else the email address
    pub fn handle(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown user")
    }
}

impl From<&AuthUser> for User {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The stored session has not been checked yet
    Loading,
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Owns the authentication state and publishes every change to subscribers
pub struct AuthContext {
    client: BackendClient,
    state: watch::Sender<AuthState>,
}

impl AuthContext {
    pub fn new(client: BackendClient) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self { client, state }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    fn publish(&self, state: AuthState) {
        tracing::debug!("Auth state: {:?}", state);
        self.state.send_replace(state);
    }

    /// Check the stored session against the auth service. Always leaves the
    /// `Loading` state: any failure ends signed out.
    pub async fn restore(&self) -> AuthState {
        let state = if !self.client.has_session() {
            AuthState::SignedOut
        } else {
            match self.client.current_user().await {
                Ok(user) => AuthState::SignedIn(User::from(&user)),
                Err(e) => {
                    tracing::warn!("Could not restore session: {}", e);
                    AuthState::SignedOut
                }
            }
        };

        self.publish(state.clone());
        state
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let session = self.client.sign_in(email, password).await?;
        let user = User::from(&session.user);
        self.publish(AuthState::SignedIn(user.clone()));
        Ok(user)
    }

    /// Register. The user is only signed in when the service confirms the
    /// account immediately.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let outcome = self.client.sign_up(email, password, username).await?;
        if let SignUpOutcome::Session(session) = &outcome {
            self.publish(AuthState::SignedIn(User::from(&session.user)));
        }
        Ok(outcome)
    }

    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let result = self.client.sign_out().await;
        self.publish(AuthState::SignedOut);
        result
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), BackendError> {
        self.client.reset_password_for_email(email).await
    }

    pub async fn update_password(
        &self,
        new_password: &str,
        recovery_token: Option<&str>,
    ) -> Result<User, BackendError> {
        let user = self
            .client
            .update_password(new_password, recovery_token)
            .await?;
        Ok(User::from(&user))
    }

    /// Guard for commands that need a signed-in user
    pub fn require_user(&self) -> Result<User, BackendError> {
        self.user().ok_or(BackendError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn context() -> AuthContext {
        let mut config = Config::default();
        config.backend.url = "https://project.supabase.co".to_string();
        config.backend.anon_key = "anon-key".to_string();
        AuthContext::new(BackendClient::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_restore_without_session_signs_out() {
        let auth = context();
        let mut rx = auth.subscribe();
        assert_eq!(*rx.borrow(), AuthState::Loading);

        assert_eq!(auth.restore().await, AuthState::SignedOut);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);
        assert!(matches!(auth.require_user(), Err(BackendError::NotAuthenticated)));
    }

    #[test]
    fn test_user_handle() {
        let user = User {
            id: Uuid::nil(),
            email: Some("ana@example.com".to_string()),
            username: None,
        };
        assert_eq!(user.handle(), "ana@example.com");
    }
}
