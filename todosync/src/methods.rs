//! Remote task methods: `tasks.setIsChecked` and `tasks.remove`.
//!
//! Both require the caller to own the task. Writes go through the store so
//! live publications see them.

use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::context::RequestContext;
use crate::entity::task;
use crate::error::{Result, TaskError};
use crate::TaskStore;

pub const SET_IS_CHECKED: &str = "tasks.setIsChecked";
pub const REMOVE: &str = "tasks.remove";

/// Set the completion flag of one of the caller's tasks.
pub async fn set_is_checked(
    store: &TaskStore,
    ctx: &RequestContext,
    task_id: &str,
    is_checked: bool,
) -> Result<task::Model> {
    let owned = owned_task(store, ctx, task_id).await?;
    if owned.is_checked == is_checked {
        return Ok(owned);
    }

    let mut active: task::ActiveModel = owned.into();
    active.is_checked = Set(is_checked);
    Ok(active.update(store).await?)
}

/// Delete one of the caller's tasks.
pub async fn remove(store: &TaskStore, ctx: &RequestContext, task_id: &str) -> Result<()> {
    let owned = owned_task(store, ctx, task_id).await?;
    task::Entity::delete_by_id(owned.id).exec(store).await?;
    log::debug!("removed task {}", task_id);
    Ok(())
}

async fn owned_task(store: &TaskStore, ctx: &RequestContext, task_id: &str) -> Result<task::Model> {
    let user_id = ctx.require_user()?;
    let found = task::Entity::find_by_id(task_id.to_string())
        .one(store)
        .await?
        .ok_or_else(|| TaskError::not_found("Task", task_id))?;
    if !found.is_owned_by(user_id) {
        return Err(TaskError::Forbidden(format!("task {}", task_id)));
    }
    Ok(found)
}
