use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use taskpad_atoms::users::{self, RegisterPayload, User};
use tokio::sync::watch;

use crate::error::AuthError;
use crate::session::IdentityProvider;

/// Cognito-backed identity provider.
///
/// Holds the access token for the active session so that logout and user
/// lookups can run against it; the session value itself is only ever
/// published on the sessions feed.
pub struct CognitoIdentity {
    cognito: CognitoClient,
    client_id: String,
    client_secret: String,
    sessions_tx: watch::Sender<Option<User>>,
    access_token: Mutex<Option<String>>,
}

impl CognitoIdentity {
    pub fn new(cognito: CognitoClient, client_id: String, client_secret: String) -> Self {
        let (sessions_tx, _) = watch::channel(None);
        Self {
            cognito,
            client_id,
            client_secret,
            sessions_tx,
            access_token: Mutex::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentity {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), AuthError> {
        let payload = RegisterPayload {
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        };
        users::service::sign_up(&self.cognito, &self.client_id, &self.client_secret, &payload)
            .await
            .map_err(AuthError::Provider)?;

        // the pool auto-confirms sign-ups, so a fresh account settles the
        // session the same way a login does
        self.login(email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let tokens = users::service::login(
            &self.cognito,
            &self.client_id,
            &self.client_secret,
            email,
            password,
        )
        .await
        .map_err(AuthError::Provider)?;

        let user = users::service::current_user(&self.cognito, &tokens.access_token)
            .await
            .map_err(AuthError::Provider)?;

        *self
            .access_token
            .lock()
            .expect("access token lock poisoned") = Some(tokens.access_token);

        tracing::info!(user_id = %user.user_id, "session established");
        self.sessions_tx.send_replace(Some(user));
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let token = self
            .access_token
            .lock()
            .expect("access token lock poisoned")
            .clone();

        if let Some(token) = token {
            users::service::logout(&self.cognito, &token)
                .await
                .map_err(AuthError::Provider)?;
        }

        *self
            .access_token
            .lock()
            .expect("access token lock poisoned") = None;

        tracing::info!("session cleared");
        self.sessions_tx.send_replace(None);
        Ok(())
    }

    fn sessions(&self) -> watch::Receiver<Option<User>> {
        self.sessions_tx.subscribe()
    }
}
