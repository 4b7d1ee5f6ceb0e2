//! Presentational components used by [`App`](crate::App).

mod login_form;
mod task_form;
mod task_item;

pub use login_form::LoginForm;
pub use task_form::TaskForm;
pub use task_item::TaskItem;
