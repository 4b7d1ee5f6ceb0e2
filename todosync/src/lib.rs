//! # todosync
//!
//! Storage, GraphQL resolvers and a live task feed for a small to-do list
//! application.
//!
//! [`TaskStore`] wraps a SeaORM [`DatabaseConnection`](sea_orm::DatabaseConnection)
//! and broadcasts a [`ChangeNotification`] after every write to the `tasks`
//! table. Two read paths sit on top of it:
//!
//! - the GraphQL schema in [`graphql`] (`loggedUser`, `tasks`, `addTask`),
//!   backed by the plain resolvers in [`resolvers`];
//! - the live publication in [`publication`], which re-queries on every change.
//!
//! The UI merges both through [`view::merge_tasks`].
//!
//! ## Quick start
//!
//! ```ignore
//! use todosync::{RequestContext, TaskStoreBuilder};
//!
//! let store = TaskStoreBuilder::new("sqlite:./todo.db?mode=rwc").build().await?;
//! let accounts = todosync::Accounts::new(store.clone());
//! let alice = accounts.ensure_user("alice", "password").await?;
//!
//! let ctx = RequestContext::for_user(alice.id);
//! todosync::resolvers::add_task(&store, &ctx, "buy milk").await?;
//! ```
//!
//! ## Key types
//!
//! - [`TaskStore`]: connection wrapper that broadcasts writes
//! - [`TaskStoreBuilder`]: configures and connects the store
//! - [`RequestContext`]: the optional caller identity threaded through every call
//! - [`TaskError`]: every failure, including "not logged in"
//! - [`TodoClient`]: in-process client used by the desktop UI

pub mod accounts;
pub mod client;
pub mod connection;
pub mod context;
pub mod entity;
pub mod error;
pub mod graphql;
pub mod messages;
pub mod methods;
pub mod publication;
pub mod registry;
pub mod resolvers;
pub mod view;

use chrono::{DateTime, SubsecRound, Utc};

pub use accounts::{Accounts, Session};
pub use client::TodoClient;
pub use connection::{SchemaBuilder, TaskStore, TaskStoreBuilder};
pub use context::{Identity, RequestContext};
pub use error::TaskError;
pub use messages::{ChangeNotification, WriteKind};
pub use publication::{LiveSnapshot, LiveTasks, TaskFilter};
pub use registry::TableRegistry;

// Re-export sea-orm for users of the library
pub use sea_orm;

/// Current server time at millisecond precision, so timestamps survive a
/// round-trip through SQLite unchanged.
pub fn server_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
