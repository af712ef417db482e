use std::env;

use aws_config::BehaviorVersion;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;

use crate::identity::CognitoIdentity;
use crate::store::DynamoTaskStore;

/// Shared AWS clients and configuration, built once at startup
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub cognito_client: CognitoClient,
    pub table_name: String,
    pub client_id: String,
    pub client_secret: String,
}

impl AppState {
    /// Build clients from the default AWS config chain plus TABLE_NAME,
    /// COGNITO_CLIENT_ID and COGNITO_CLIENT_SECRET
    pub async fn from_env() -> Result<Self, String> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "taskpad".to_string());
        let client_id = env::var("COGNITO_CLIENT_ID")
            .map_err(|_| "COGNITO_CLIENT_ID must be set".to_string())?;
        let client_secret = env::var("COGNITO_CLIENT_SECRET")
            .map_err(|_| "COGNITO_CLIENT_SECRET must be set".to_string())?;

        Ok(Self {
            dynamo_client: DynamoClient::new(&config),
            cognito_client: CognitoClient::new(&config),
            table_name,
            client_id,
            client_secret,
        })
    }

    pub fn task_store(&self) -> DynamoTaskStore {
        DynamoTaskStore::new(self.dynamo_client.clone(), self.table_name.clone())
    }

    pub fn identity(&self) -> CognitoIdentity {
        CognitoIdentity::new(
            self.cognito_client.clone(),
            self.client_id.clone(),
            self.client_secret.clone(),
        )
    }
}
