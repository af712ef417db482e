use std::sync::Arc;

use async_trait::async_trait;
use taskpad_atoms::users::User;
use tokio::sync::watch;

use crate::error::AuthError;

/// Identity provider boundary. Operations trigger provider-side changes
/// only; the session value itself always arrives through the feed returned
/// by [`IdentityProvider::sessions`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), AuthError>;

    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    /// Current-session feed: `Some(user)` while signed in, `None` otherwise
    fn sessions(&self) -> watch::Receiver<Option<User>>;
}

/// Thin current-session handle over an identity provider.
#[derive(Clone)]
pub struct SessionClient {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionClient {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn sessions(&self) -> watch::Receiver<Option<User>> {
        self.provider.sessions()
    }

    /// Latest session value as of this call
    pub fn current_user(&self) -> Option<User> {
        self.provider.sessions().borrow().clone()
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), AuthError> {
        self.provider.register(email, password, display_name).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.provider.login(email, password).await
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.provider.logout().await
    }
}
