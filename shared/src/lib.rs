pub mod changes;
pub mod error;
pub mod identity;
pub mod session;
pub mod state;
pub mod store;
pub mod task_client;

#[cfg(test)]
pub(crate) mod fakes;

pub use changes::TaskChange;
pub use error::{AuthError, StoreError};
pub use identity::CognitoIdentity;
pub use session::{IdentityProvider, SessionClient};
pub use state::AppState;
pub use store::{DynamoTaskStore, TaskStore};
pub use task_client::TaskClient;
