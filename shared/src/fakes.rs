//! In-memory stand-ins for the store and identity boundaries, used by the
//! client contract tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use taskpad_atoms::tasks::{CreateTaskPayload, Priority, Task, UpdateTaskPayload};
use taskpad_atoms::users::User;
use tokio::sync::{broadcast, watch};

use crate::changes::TaskChange;
use crate::error::{AuthError, StoreError};
use crate::session::IdentityProvider;
use crate::store::TaskStore;

pub(crate) fn payload(title: &str) -> CreateTaskPayload {
    CreateTaskPayload {
        title: title.to_string(),
        description: String::new(),
        due_date: "2025-06-15T09:00:00Z".to_string(),
        priority: Priority::Medium,
        completed: false,
    }
}

pub(crate) fn seeded_task(task_id: &str, user_id: &str, title: &str) -> Task {
    Task {
        task_id: task_id.to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        due_date: "2025-06-15T09:00:00Z".to_string(),
        priority: Priority::Medium,
        completed: false,
        created_at: "2025-06-01T00:00:00Z".to_string(),
        updated_at: "2025-06-01T00:00:00Z".to_string(),
    }
}

/// Wait until the view satisfies a predicate, bounded so a broken watcher
/// fails the test instead of hanging it.
pub(crate) async fn wait_for_view(
    view: &mut watch::Receiver<Vec<Task>>,
    pred: impl Fn(&[Task]) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let done = pred(view.borrow_and_update().as_slice());
            if done {
                return;
            }
            view.changed().await.expect("snapshot channel closed");
        }
    })
    .await
    .expect("timed out waiting for snapshot");
}

/// Owner-partitioned in-memory task store with the same change-feed contract
/// as the Dynamo-backed one.
pub(crate) struct MemoryTaskStore {
    tasks: Mutex<HashMap<String, Vec<Task>>>,
    changes_tx: broadcast::Sender<TaskChange>,
    reject_writes: AtomicBool,
    next_id: AtomicUsize,
}

impl MemoryTaskStore {
    pub(crate) fn new() -> Self {
        let (changes_tx, _) = broadcast::channel(64);
        Self {
            tasks: Mutex::new(HashMap::new()),
            changes_tx,
            reject_writes: AtomicBool::new(false),
            next_id: AtomicUsize::new(1),
        }
    }

    pub(crate) fn seed(&self, user_id: &str, task: Task) {
        self.tasks
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(task);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.reject_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn notify(&self, change: TaskChange) {
        let _ = self.changes_tx.send(change);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            Err(StoreError::Rejected("write rejected by test store".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn load_snapshot(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_task(
        &self,
        user_id: &str,
        payload: CreateTaskPayload,
    ) -> Result<Task, StoreError> {
        self.check_writable()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task {
            task_id: format!("task-{n}"),
            user_id: user_id.to_string(),
            title: payload.title,
            description: payload.description,
            due_date: payload.due_date,
            priority: payload.priority,
            completed: payload.completed,
            created_at: "2025-06-01T00:00:00Z".to_string(),
            updated_at: "2025-06-01T00:00:00Z".to_string(),
        };
        self.tasks
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(task.clone());
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
        self.check_writable()?;
        let updated = {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .get_mut(user_id)
                .and_then(|list| list.iter_mut().find(|t| t.task_id == task_id))
                .ok_or(StoreError::NotFound)?;
            if let Some(title) = payload.title {
                task.title = title;
            }
            if let Some(description) = payload.description {
                task.description = description;
            }
            if let Some(due_date) = payload.due_date {
                task.due_date = due_date;
            }
            if let Some(priority) = payload.priority {
                task.priority = priority;
            }
            if let Some(completed) = payload.completed {
                task.completed = completed;
            }
            task.updated_at = "2025-06-02T00:00:00Z".to_string();
            task.clone()
        };
        self.notify(TaskChange::TaskUpdated {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(updated)
    }

    async fn toggle_complete(&self, user_id: &str, task_id: &str) -> Result<Task, StoreError> {
        self.check_writable()?;
        let updated = {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .get_mut(user_id)
                .and_then(|list| list.iter_mut().find(|t| t.task_id == task_id))
                .ok_or(StoreError::NotFound)?;
            task.completed = !task.completed;
            task.updated_at = "2025-06-02T00:00:00Z".to_string();
            task.clone()
        };
        self.notify(TaskChange::TaskUpdated {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(updated)
    }

    async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        if let Some(list) = self.tasks.lock().unwrap().get_mut(user_id) {
            list.retain(|t| t.task_id != task_id);
        }
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

/// In-memory identity provider: accounts live in a map, sessions settle the
/// watch feed exactly like the Cognito adapter.
pub(crate) struct FakeIdentity {
    // email -> (password, display_name)
    accounts: Mutex<HashMap<String, (String, String)>>,
    sessions_tx: watch::Sender<Option<User>>,
}

impl FakeIdentity {
    pub(crate) fn new() -> Self {
        let (sessions_tx, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            sessions_tx,
        }
    }

    pub(crate) fn uid_for(email: &str) -> String {
        format!("uid-{email}")
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(), AuthError> {
        {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::Provider(
                    "an account with this email already exists".to_string(),
                ));
            }
            accounts.insert(
                email.to_string(),
                (password.to_string(), display_name.to_string()),
            );
        }
        self.login(email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let display_name = {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some((stored, name)) if stored == password => name.clone(),
                _ => {
                    return Err(AuthError::Provider(
                        "incorrect email or password".to_string(),
                    ))
                }
            }
        };
        self.sessions_tx.send_replace(Some(User {
            user_id: Self::uid_for(email),
            display_name,
            email: email.to_string(),
        }));
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.sessions_tx.send_replace(None);
        Ok(())
    }

    fn sessions(&self) -> watch::Receiver<Option<User>> {
        self.sessions_tx.subscribe()
    }
}
