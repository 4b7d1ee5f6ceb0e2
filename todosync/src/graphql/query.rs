use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::request_context;
use super::types::{Task, User};
use crate::resolvers;
use crate::TaskStore;

#[derive(Default)]
pub struct Query;

#[Object]
impl Query {
    /// The caller's account, or null when nobody is logged in.
    async fn logged_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let store = ctx.data::<TaskStore>()?;
        let user = resolvers::logged_user(store, &request_context(ctx))
            .await
            .map_err(|e| e.extend())?;
        Ok(user.map(User::from))
    }

    /// The caller's tasks, newest first.
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Option<Vec<Task>>> {
        let store = ctx.data::<TaskStore>()?;
        let tasks = resolvers::tasks(store, &request_context(ctx))
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(tasks.into_iter().map(Task::from).collect()))
    }
}
