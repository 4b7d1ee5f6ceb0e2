//! GraphQL surface: `Query.loggedUser`, `Query.tasks`, `Mutation.addTask`
//! and `Subscription.tasks`, the live publication.
//!
//! The schema carries the [`TaskStore`] as schema data; each request carries
//! its own [`RequestContext`] as request data. A request without one is
//! treated as anonymous.

mod mutation;
mod query;
mod subscription;
pub mod types;

use async_graphql::{Error, ErrorExtensions, Request, Response, Schema};

use crate::context::RequestContext;
use crate::error::TaskError;
use crate::TaskStore;

pub use mutation::Mutation;
pub use query::Query;
pub use subscription::Subscription;
pub use types::{Task, TaskFeed, User};

pub type TodoSchema = Schema<Query, Mutation, Subscription>;

pub fn build_schema(store: TaskStore) -> TodoSchema {
    Schema::build(Query, Mutation, Subscription)
        .data(store)
        .finish()
}

/// The schema in SDL form.
pub fn sdl() -> String {
    Schema::build(Query, Mutation, Subscription)
        .finish()
        .sdl()
}

/// Run `query` as the caller described by `ctx`.
pub async fn execute(schema: &TodoSchema, ctx: RequestContext, query: &str) -> Response {
    schema.execute(Request::new(query).data(ctx)).await
}

impl ErrorExtensions for TaskError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

fn request_context(ctx: &async_graphql::Context<'_>) -> RequestContext {
    ctx.data_opt::<RequestContext>().cloned().unwrap_or_default()
}
