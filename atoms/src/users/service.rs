use super::model::{AuthTokens, RegisterPayload, User};
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Cognito SECRET_HASH: HMAC-SHA256 over username + client id, keyed by the client secret
pub fn secret_hash(client_id: &str, client_secret: &str, username: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(client_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Sign up a new account with email and display name attributes
pub async fn sign_up(
    cognito: &CognitoClient,
    client_id: &str,
    client_secret: &str,
    payload: &RegisterPayload,
) -> Result<User, String> {
    let email_attr = AttributeType::builder()
        .name("email")
        .value(payload.email.as_str())
        .build()
        .map_err(|e| format!("Cognito attribute error: {}", e))?;
    let name_attr = AttributeType::builder()
        .name("name")
        .value(payload.display_name.as_str())
        .build()
        .map_err(|e| format!("Cognito attribute error: {}", e))?;

    let resp = cognito
        .sign_up()
        .client_id(client_id)
        .secret_hash(secret_hash(client_id, client_secret, &payload.email))
        .username(payload.email.as_str())
        .password(payload.password.as_str())
        .user_attributes(email_attr)
        .user_attributes(name_attr)
        .send()
        .await
        .map_err(|e| format!("Cognito sign_up error: {}", e))?;

    Ok(User {
        user_id: resp.user_sub().to_string(),
        display_name: payload.display_name.clone(),
        email: payload.email.clone(),
    })
}

/// Authenticate with email and password (USER_PASSWORD_AUTH flow)
pub async fn login(
    cognito: &CognitoClient,
    client_id: &str,
    client_secret: &str,
    email: &str,
    password: &str,
) -> Result<AuthTokens, String> {
    let resp = cognito
        .initiate_auth()
        .client_id(client_id)
        .auth_flow(AuthFlowType::UserPasswordAuth)
        .auth_parameters("USERNAME", email)
        .auth_parameters("PASSWORD", password)
        .auth_parameters("SECRET_HASH", secret_hash(client_id, client_secret, email))
        .send()
        .await
        .map_err(|e| format!("Cognito initiate_auth error: {}", e))?;

    let result = resp
        .authentication_result()
        .ok_or_else(|| "Cognito returned no authentication result".to_string())?;

    Ok(AuthTokens {
        access_token: result.access_token().unwrap_or_default().to_string(),
        id_token: result.id_token().unwrap_or_default().to_string(),
        refresh_token: result.refresh_token().map(|s| s.to_string()),
        expires_in: result.expires_in(),
    })
}

/// Resolve the signed-in user record from an access token
pub async fn current_user(cognito: &CognitoClient, access_token: &str) -> Result<User, String> {
    let resp = cognito
        .get_user()
        .access_token(access_token)
        .send()
        .await
        .map_err(|e| format!("Cognito get_user error: {}", e))?;

    let mut user = User {
        user_id: String::new(),
        display_name: String::new(),
        email: String::new(),
    };
    for attr in resp.user_attributes() {
        match attr.name() {
            "sub" => user.user_id = attr.value().unwrap_or_default().to_string(),
            "name" => user.display_name = attr.value().unwrap_or_default().to_string(),
            "email" => user.email = attr.value().unwrap_or_default().to_string(),
            _ => {}
        }
    }
    if user.display_name.trim().is_empty() {
        user.display_name = user.email.split('@').next().unwrap_or("User").to_string();
    }

    Ok(user)
}

/// Invalidate every token issued for this session
pub async fn logout(cognito: &CognitoClient, access_token: &str) -> Result<(), String> {
    cognito
        .global_sign_out()
        .access_token(access_token)
        .send()
        .await
        .map_err(|e| format!("Cognito global_sign_out error: {}", e))?;

    Ok(())
}
