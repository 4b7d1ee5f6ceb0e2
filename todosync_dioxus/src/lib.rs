//! Dioxus desktop front end for todosync.
//!
//! - [`launch()`]: creates a tokio runtime, builds the store and a
//!   [`TodoClient`](todosync::TodoClient), runs your setup closure, and launches
//!   Dioxus desktop with the client in the root context.
//! - [`use_client()`]: retrieves the `TodoClient` from Dioxus context.
//! - [`use_task_status`]: live completion flags, pushed by the store.
//! - [`use_tasks_query`]: the GraphQL `tasks` query, restartable as a refetch.
//! - [`App`]: the root component: header, login form or task list.
//!
//! ## Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     let store = todosync::TaskStoreBuilder::new("sqlite:./todo.db?mode=rwc");
//!     todosync_dioxus::launch(store, |client| async move {
//!         client.accounts().ensure_user("meteorite", "password").await?;
//!         Ok(())
//!     }, todosync_dioxus::App)
//! }
//! ```

pub mod app;
pub mod components;
pub mod hooks;
pub mod launch;

pub use app::App;
pub use hooks::*;
pub use launch::{build_client, launch, use_client};
