use async_graphql::{Context, ErrorExtensions, Result};
use futures::stream::{BoxStream, StreamExt};

use super::request_context;
use super::types::TaskFeed;
use crate::publication::{self, TaskFilter};
use crate::TaskStore;

#[derive(Default)]
pub struct Subscription;

#[async_graphql::Subscription]
impl Subscription {
    /// The caller's tasks, pushed again after every change to the task table.
    async fn tasks(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] hide_completed: bool,
    ) -> Result<BoxStream<'static, TaskFeed>> {
        let store = ctx.data::<TaskStore>()?;
        let filter = TaskFilter { hide_completed };
        let live = publication::subscribe(store, &request_context(ctx), filter)
            .map_err(|e| e.extend())?;
        Ok(live.into_stream().map(TaskFeed::from).boxed())
    }
}
