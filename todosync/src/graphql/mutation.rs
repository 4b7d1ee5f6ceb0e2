use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::request_context;
use super::types::Task;
use crate::resolvers;
use crate::TaskStore;

#[derive(Default)]
pub struct Mutation;

#[Object]
impl Mutation {
    /// Create a task owned by the caller.
    async fn add_task(&self, ctx: &Context<'_>, text: String) -> Result<Option<Task>> {
        let store = ctx.data::<TaskStore>()?;
        let created = resolvers::add_task(store, &request_context(ctx), &text)
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(created.into()))
    }
}
