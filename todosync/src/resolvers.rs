//! Query and mutation resolvers over the task collection.
//!
//! These are plain async functions; the GraphQL layer in [`crate::graphql`]
//! only adapts their inputs and maps [`TaskError`] onto GraphQL errors.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::entity::{task, user};
use crate::error::{Result, TaskError};
use crate::TaskStore;

/// The caller's account, or `None` when nobody is logged in.
///
/// A session pointing at a deleted account also resolves to `None`.
pub async fn logged_user(store: &TaskStore, ctx: &RequestContext) -> Result<Option<user::Model>> {
    let Some(user_id) = ctx.user_id() else {
        return Ok(None);
    };
    Ok(user::Entity::find_by_id(user_id.to_string())
        .one(store)
        .await?)
}

/// All tasks owned by the caller, newest first.
pub async fn tasks(store: &TaskStore, ctx: &RequestContext) -> Result<Vec<task::Model>> {
    let user_id = ctx.require_user()?;
    Ok(owned_tasks(user_id).all(store).await?)
}

/// Create a task owned by the caller.
///
/// The text is trimmed; blank text is rejected.
pub async fn add_task(store: &TaskStore, ctx: &RequestContext, text: &str) -> Result<task::Model> {
    let user_id = ctx.require_user()?;
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::Validation("task text must not be empty".into()));
    }

    let new_task = task::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        text: Set(text.to_string()),
        created_at: Set(crate::server_time()),
        is_checked: Set(false),
        user_id: Set(user_id.to_string()),
    };
    let created = new_task.insert(store).await?;
    log::debug!("user {} added task {}", user_id, created.id);
    Ok(created)
}

/// The owner of `task`.
pub async fn task_user(store: &TaskStore, task: &task::Model) -> Result<user::Model> {
    user::Entity::find_by_id(task.user_id.clone())
        .one(store)
        .await?
        .ok_or_else(|| TaskError::not_found("User", task.user_id.clone()))
}

/// Tasks owned by `user_id`, newest first.
pub(crate) fn owned_tasks(user_id: &str) -> Select<task::Entity> {
    task::Entity::find()
        .filter(task::Column::UserId.eq(user_id))
        .order_by_desc(task::Column::CreatedAt)
}
