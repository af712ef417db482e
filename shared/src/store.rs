use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use taskpad_atoms::tasks::{self, CreateTaskPayload, Task, UpdateTaskPayload};
use tokio::sync::broadcast;

use crate::changes::TaskChange;
use crate::error::StoreError;

/// Remote document store boundary: owner-scoped snapshot reads, write-through
/// mutations, and a change feed telling subscribers when to re-read.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Full current state of one owner's task collection
    async fn load_snapshot(&self, user_id: &str) -> Result<Vec<Task>, StoreError>;

    async fn create_task(
        &self,
        user_id: &str,
        payload: CreateTaskPayload,
    ) -> Result<Task, StoreError>;

    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<Task, StoreError>;

    async fn toggle_complete(&self, user_id: &str, task_id: &str) -> Result<Task, StoreError>;

    async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<(), StoreError>;

    /// Subscribe to change notifications across the whole collection
    fn changes(&self) -> broadcast::Receiver<TaskChange>;
}

/// DynamoDB-backed task store.
///
/// Every successful write publishes its own change event, so a subscribed
/// view refreshes without the writer ever touching local state. Writes from
/// other processes arrive through [`DynamoTaskStore::notify`].
pub struct DynamoTaskStore {
    client: DynamoClient,
    table_name: String,
    changes_tx: broadcast::Sender<TaskChange>,
}

impl DynamoTaskStore {
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        let (changes_tx, _) = broadcast::channel(256);
        Self {
            client,
            table_name,
            changes_tx,
        }
    }

    /// Inject a change event from an external feed (e.g. a stream consumer
    /// relaying table changes made by other writers).
    pub fn notify(&self, change: TaskChange) {
        // send only fails when nobody is subscribed, which is fine
        let _ = self.changes_tx.send(change);
    }
}

#[async_trait]
impl TaskStore for DynamoTaskStore {
    async fn load_snapshot(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        tasks::service::load_tasks_for_user(&self.client, &self.table_name, user_id)
            .await
            .map_err(StoreError::from)
    }

    async fn create_task(
        &self,
        user_id: &str,
        payload: CreateTaskPayload,
    ) -> Result<Task, StoreError> {
        let task = tasks::service::create_task(&self.client, &self.table_name, user_id, payload)
            .await
            .map_err(StoreError::from)?;
        self.notify(TaskChange::TaskCreated {
            user_id: user_id.to_string(),
            task_id: task.task_id.clone(),
        });
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<Task, StoreError> {
        let task = tasks::service::update_task(
            &self.client,
            &self.table_name,
            user_id,
            task_id,
            payload,
        )
        .await
        .map_err(StoreError::from)?;
        self.notify(TaskChange::TaskUpdated {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(task)
    }

    async fn toggle_complete(&self, user_id: &str, task_id: &str) -> Result<Task, StoreError> {
        let task =
            tasks::service::toggle_complete(&self.client, &self.table_name, user_id, task_id)
                .await
                .map_err(StoreError::from)?;
        self.notify(TaskChange::TaskUpdated {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(task)
    }

    async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<(), StoreError> {
        tasks::service::delete_task(&self.client, &self.table_name, user_id, task_id)
            .await
            .map_err(StoreError::from)?;
        self.notify(TaskChange::TaskDeleted {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<TaskChange> {
        self.changes_tx.subscribe()
    }
}
