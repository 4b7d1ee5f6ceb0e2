//! In-process client used by the UI.
//!
//! Reads go through two independent paths: [`TodoClient::fetch_tasks`] runs the
//! GraphQL `tasks` query, [`TodoClient::subscribe_status`] opens the live
//! publication. Writes are either GraphQL mutations (`addTask`) or remote
//! methods (`tasks.setIsChecked`, `tasks.remove`).

use std::sync::{Arc, RwLock};

use async_graphql::{Request, ServerError, Value, Variables};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::accounts::{Accounts, Session};
use crate::context::RequestContext;
use crate::error::{Result, TaskError};
use crate::graphql::{self, TodoSchema};
use crate::methods;
use crate::publication::{self, LiveTasks, TaskFilter};
use crate::view::{TaskRow, TaskSummary, ViewUser};
use crate::TaskStore;

pub const TASKS_QUERY: &str = "query Tasks { tasks { _id text } }";
pub const LOGGED_USER_QUERY: &str = "query LoggedUser { loggedUser { _id username } }";
pub const ADD_TASK_MUTATION: &str =
    "mutation AddTask($text: String!) { addTask(text: $text) { _id text } }";

#[derive(Deserialize)]
struct TasksData {
    tasks: Option<Vec<TaskSummary>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggedUserData {
    logged_user: Option<ViewUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTaskData {
    add_task: Option<TaskSummary>,
}

#[derive(Clone)]
pub struct TodoClient {
    store: TaskStore,
    schema: TodoSchema,
    accounts: Accounts,
    session: Arc<RwLock<Option<Session>>>,
}

impl TodoClient {
    pub fn new(store: TaskStore) -> Self {
        let accounts = Accounts::new(store.clone());
        Self::with_accounts(store, accounts)
    }

    /// Share an account registry (and its sessions) with another component.
    pub fn with_accounts(store: TaskStore, accounts: Accounts) -> Self {
        Self {
            schema: graphql::build_schema(store.clone()),
            store,
            accounts,
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    /// The context every call from this client runs under.
    pub fn context(&self) -> RequestContext {
        let token = self
            .session
            .read()
            .ok()
            .and_then(|session| session.as_ref().map(|s| s.token.clone()));
        self.accounts.context_for(token.as_deref())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<ViewUser> {
        let session = self.accounts.login(username, password).await?;
        if let Ok(mut current) = self.session.write() {
            *current = Some(session);
        }
        self.logged_user()
            .await?
            .ok_or(TaskError::InvalidCredentials)
    }

    pub fn logout(&self) {
        let session = self.session.write().ok().and_then(|mut s| s.take());
        if let Some(session) = session {
            self.accounts.logout(&session.token);
        }
    }

    pub async fn logged_user(&self) -> Result<Option<ViewUser>> {
        let data: LoggedUserData = self.run(Request::new(LOGGED_USER_QUERY)).await?;
        Ok(data.logged_user)
    }

    /// Pull the caller's tasks (`_id` and `text` only).
    pub async fn fetch_tasks(&self) -> Result<Vec<TaskSummary>> {
        let data: TasksData = self.run(Request::new(TASKS_QUERY)).await?;
        Ok(data.tasks.unwrap_or_default())
    }

    pub async fn add_task(&self, text: &str) -> Result<TaskSummary> {
        let request = Request::new(ADD_TASK_MUTATION)
            .variables(Variables::from_json(serde_json::json!({ "text": text })));
        let data: AddTaskData = self.run(request).await?;
        data.add_task.ok_or(TaskError::Unauthenticated)
    }

    /// Open the live publication of completion flags.
    pub fn subscribe_status(&self, filter: TaskFilter) -> Result<LiveTasks> {
        publication::subscribe(&self.store, &self.context(), filter)
    }

    /// Flip a task's completion flag without waiting for the write.
    ///
    /// The returned handle may be ignored; the publication reports the result.
    pub fn toggle_checked(&self, row: &TaskRow) -> JoinHandle<()> {
        let store = self.store.clone();
        let ctx = self.context();
        let id = row.id.clone();
        let flag = !row.checked();
        tokio::spawn(async move {
            if let Err(e) = methods::set_is_checked(&store, &ctx, &id, flag).await {
                log::error!("Failed to toggle task {}: {}", id, e);
            }
        })
    }

    /// Remove a task. The query source is not refetched.
    pub async fn remove_task(&self, row: &TaskRow) -> Result<()> {
        methods::remove(&self.store, &self.context(), &row.id).await
    }

    /// Remove a task, then refetch the task list.
    pub async fn delete_task(&self, row: &TaskRow) -> Result<Vec<TaskSummary>> {
        self.remove_task(row).await?;
        self.fetch_tasks().await
    }

    async fn run<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let response = self.schema.execute(request.data(self.context())).await;
        if let Some(error) = response.errors.first() {
            return Err(error_from_graphql(error));
        }
        decode(response.data)
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T> {
    let json = data
        .into_json()
        .map_err(|e| TaskError::Query(e.to_string()))?;
    serde_json::from_value(json).map_err(|e| TaskError::Query(e.to_string()))
}

fn error_from_graphql(error: &ServerError) -> TaskError {
    let code = error
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .and_then(|code| match code {
            Value::String(code) => Some(code.as_str()),
            _ => None,
        });
    match code {
        Some("UNAUTHENTICATED") => TaskError::Unauthenticated,
        Some("FORBIDDEN") => TaskError::Forbidden(error.message.clone()),
        Some("BAD_USER_INPUT") => TaskError::Validation(error.message.clone()),
        _ => TaskError::Query(error.message.clone()),
    }
}
