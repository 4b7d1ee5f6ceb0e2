//! HTTP surface for todosync.
//!
//! - `POST /graphql`: the GraphQL endpoint
//! - `GET /graphql/ws`: GraphQL subscriptions (the live task feed) over WebSocket
//! - `GET /graphql/schema`: the schema in SDL form
//! - `POST /login`, `POST /logout`: bearer sessions
//! - `POST /methods/tasks.setIsChecked`, `POST /methods/tasks.remove`: task methods
//!
//! Every request may carry `Authorization: Bearer <token>`; the token is
//! resolved into the [`RequestContext`](todosync::RequestContext) the handlers run under.

pub mod config;
pub mod error;
pub mod routes;

pub use config::Config;
pub use routes::{router, AppState};
