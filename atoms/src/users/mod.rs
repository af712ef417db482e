pub mod model;
pub mod service;

pub use model::{AuthTokens, RegisterPayload, User};
pub use service::*;
