use async_graphql::{Context, ErrorExtensions, ID, Object, Result, SimpleObject};

use crate::entity::{task, user};
use crate::error::TaskError;
use crate::publication::LiveSnapshot;
use crate::resolvers;
use crate::TaskStore;

#[derive(SimpleObject, Clone, Debug)]
pub struct User {
    #[graphql(name = "_id")]
    pub id: ID,
    pub username: Option<String>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: ID(model.id),
            username: Some(model.username),
        }
    }
}

/// A task as exposed over GraphQL. The owner is resolved lazily.
pub struct Task(pub task::Model);

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl Task {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn text(&self) -> Option<String> {
        Some(self.0.text.clone())
    }

    /// RFC 3339, UTC.
    async fn created_at(&self) -> Option<String> {
        Some(self.0.created_at.to_rfc3339())
    }

    async fn is_checked(&self) -> Option<bool> {
        Some(self.0.is_checked)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let store = ctx.data::<TaskStore>()?;
        match resolvers::task_user(store, &self.0).await {
            Ok(owner) => Ok(Some(owner.into())),
            Err(TaskError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.extend()),
        }
    }
}

/// One push of the live task publication.
#[derive(SimpleObject)]
pub struct TaskFeed {
    pub ready: bool,
    pub tasks: Vec<Task>,
    /// Unchecked tasks, regardless of `hideCompleted`.
    pub pending_count: u64,
    /// Set when the latest refresh failed; `tasks` is then the last good list.
    pub error: Option<String>,
}

impl From<LiveSnapshot> for TaskFeed {
    fn from(snapshot: LiveSnapshot) -> Self {
        Self {
            ready: snapshot.ready,
            tasks: snapshot.tasks.into_iter().map(Task::from).collect(),
            pending_count: snapshot.pending_count,
            error: snapshot.error,
        }
    }
}
