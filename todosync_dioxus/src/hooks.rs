//! Dioxus hooks for the two task sources.
//!
//! [`use_task_status`] follows the live publication and is pushed new flags
//! on every write. [`use_tasks_query`] runs the GraphQL `tasks` query once
//! and again whenever the returned resource is restarted.

use dioxus::prelude::*;
use todosync::view::{QueryState, StatusState, TaskSummary, ViewUser};
use todosync::{TaskError, TaskFilter, TodoClient};

/// The logged-in user. Starts empty and is filled from `loggedUser`.
pub fn use_logged_user(client: TodoClient) -> Signal<Option<ViewUser>> {
    let mut user = use_signal(|| None::<ViewUser>);

    use_effect(move || {
        let client = client.clone();
        spawn(async move {
            match client.logged_user().await {
                Ok(current) => user.set(current),
                Err(e) => log::error!("Failed to load logged user: {}", e),
            }
        });
    });

    user
}

/// Live completion flags for the logged-in user.
///
/// Resubscribes whenever `user` or `hide_completed` changes; the previous
/// publication is dropped along with its cancelled future.
pub fn use_task_status(
    client: TodoClient,
    user: Signal<Option<ViewUser>>,
    hide_completed: Signal<bool>,
) -> Signal<StatusState> {
    let mut status = use_signal(StatusState::default);

    let _publication = use_resource(move || {
        let client = client.clone();
        async move {
            let logged_in = user.read().is_some();
            let filter = TaskFilter {
                hide_completed: hide_completed(),
            };
            status.set(StatusState::default());
            if !logged_in {
                return;
            }

            let mut live = match client.subscribe_status(filter) {
                Ok(live) => live,
                Err(e) => {
                    log::error!("Failed to subscribe to tasks: {}", e);
                    status.set(StatusState::failed(e.to_string()));
                    return;
                }
            };
            loop {
                status.set(StatusState::from(&live.snapshot()));
                if live.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    status
}

/// The GraphQL `tasks` query. Call `.restart()` on the result to refetch.
pub fn use_tasks_query(
    client: TodoClient,
    user: Signal<Option<ViewUser>>,
) -> Resource<Result<Vec<TaskSummary>, TaskError>> {
    use_resource(move || {
        let client = client.clone();
        async move {
            if user.read().is_none() {
                return Ok(Vec::new());
            }
            client.fetch_tasks().await
        }
    })
}

/// Collapse the query resource into the view's query state.
pub fn query_state(tasks: &Resource<Result<Vec<TaskSummary>, TaskError>>) -> QueryState {
    match &*tasks.read() {
        None => QueryState::loading(),
        Some(Ok(fetched)) => QueryState::loaded(fetched.clone()),
        Some(Err(e)) => {
            log::warn!("tasks query failed: {}", e);
            QueryState::loaded(Vec::new())
        }
    }
}
