use std::sync::{Arc, Mutex};

use taskpad_atoms::tasks::{CreateTaskPayload, Task, UpdateTaskPayload};
use taskpad_atoms::users::User;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::store::TaskStore;

/// Live, read-mostly mirror of one owner's task collection.
///
/// Writes go straight through to the store and never mutate the local view;
/// the view changes only when the background watcher publishes the next full
/// snapshot, so it is eventually consistent with respect to writes. Changing
/// the watched owner tears the subscription down and resets the view to
/// empty until the new owner's first snapshot arrives.
#[derive(Clone)]
pub struct TaskClient {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn TaskStore>,
    view_tx: Arc<watch::Sender<Vec<Task>>>,
    state: Mutex<OwnerState>,
}

struct OwnerState {
    user_id: Option<String>,
    watcher: Option<JoinHandle<()>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(watcher) = state.watcher.take() {
                watcher.abort();
            }
        }
    }
}

impl TaskClient {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let (view_tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                store,
                view_tx: Arc::new(view_tx),
                state: Mutex::new(OwnerState {
                    user_id: None,
                    watcher: None,
                }),
            }),
        }
    }

    /// Subscribe to snapshot deliveries; each received value supersedes the
    /// previous one wholesale.
    pub fn tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.inner.view_tx.subscribe()
    }

    /// Latest delivered snapshot
    pub fn current(&self) -> Vec<Task> {
        self.inner.view_tx.subscribe().borrow().clone()
    }

    /// Switch the watched owner. Tears down any previous subscription,
    /// resets the view to empty immediately, and (for `Some`) establishes a
    /// fresh subscription for the new owner. A no-op when the owner is
    /// unchanged.
    pub fn set_user(&self, user_id: Option<String>) {
        let mut state = self.inner.state.lock().expect("owner state poisoned");
        if state.user_id == user_id {
            return;
        }

        if let Some(watcher) = state.watcher.take() {
            watcher.abort();
            tracing::info!(user_id = ?state.user_id, "task subscription torn down");
        }
        state.user_id = user_id.clone();

        // No caching across owner switches: the old owner's tasks are gone
        // before the new owner's first snapshot shows up.
        self.inner.view_tx.send_replace(Vec::new());

        if let Some(uid) = user_id {
            state.watcher = Some(spawn_watcher(
                Arc::clone(&self.inner.store),
                Arc::clone(&self.inner.view_tx),
                uid,
            ));
        }
    }

    /// Drive the watched owner from an identity session feed: login and
    /// logout re-scope the subscription automatically.
    pub fn follow(&self, mut sessions: watch::Receiver<Option<User>>) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            loop {
                let user_id = sessions
                    .borrow_and_update()
                    .as_ref()
                    .map(|user| user.user_id.clone());
                client.set_user(user_id);
                if sessions.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    pub async fn create(&self, payload: CreateTaskPayload) -> Result<Task, StoreError> {
        let user_id = self.require_user()?;
        self.inner.store.create_task(&user_id, payload).await
    }

    pub async fn update(
        &self,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<Task, StoreError> {
        let user_id = self.require_user()?;
        self.inner.store.update_task(&user_id, task_id, payload).await
    }

    pub async fn toggle_complete(&self, task_id: &str) -> Result<Task, StoreError> {
        let user_id = self.require_user()?;
        self.inner.store.toggle_complete(&user_id, task_id).await
    }

    pub async fn delete(&self, task_id: &str) -> Result<(), StoreError> {
        let user_id = self.require_user()?;
        self.inner.store.delete_task(&user_id, task_id).await
    }

    fn require_user(&self) -> Result<String, StoreError> {
        self.inner
            .state
            .lock()
            .expect("owner state poisoned")
            .user_id
            .clone()
            .ok_or_else(|| StoreError::Rejected("no user signed in".to_string()))
    }
}

/// Subscribe to the change feed, deliver an initial snapshot, then reload on
/// every event touching this owner. Subscribing before the first load means
/// a write landing in between is still picked up.
fn spawn_watcher(
    store: Arc<dyn TaskStore>,
    view_tx: Arc<watch::Sender<Vec<Task>>>,
    user_id: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut changes = store.changes();
        tracing::info!(user_id = %user_id, "task subscription established");

        refresh(store.as_ref(), &view_tx, &user_id).await;

        loop {
            match changes.recv().await {
                Ok(change) if change.user_id() == user_id => {
                    refresh(store.as_ref(), &view_tx, &user_id).await;
                }
                Ok(_) => {} // someone else's task; not in this view
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "change feed lagged, resyncing");
                    refresh(store.as_ref(), &view_tx, &user_id).await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn refresh(store: &dyn TaskStore, view_tx: &watch::Sender<Vec<Task>>, user_id: &str) {
    match store.load_snapshot(user_id).await {
        Ok(snapshot) => {
            view_tx.send_replace(snapshot);
        }
        // keep the previous view; the next change event retries
        Err(e) => tracing::warn!(user_id = %user_id, "snapshot refresh failed: {e}"),
    }
}
