use serde::{Deserialize, Serialize};

/// Authenticated user as reported by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "uid")]
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Token set returned by a successful login
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i32,
}
