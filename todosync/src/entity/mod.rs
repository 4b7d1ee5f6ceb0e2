//! SeaORM entities backing the task and user collections.

pub mod task;
pub mod user;
