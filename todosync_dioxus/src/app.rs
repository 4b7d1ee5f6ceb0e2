use dioxus::prelude::*;
use todosync::view::{AppState, Screen, TaskRow};

use crate::components::{LoginForm, TaskForm, TaskItem};
use crate::hooks::{query_state, use_logged_user, use_task_status, use_tasks_query};
use crate::launch::use_client;

const STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 600px; margin: 40px auto; padding: 0 20px; }
    .app-bar { border-bottom: 1px solid #ddd; margin-bottom: 20px; }
    h1 { color: #333; }
    .user { cursor: pointer; color: #555; margin-bottom: 12px; }
    .task-form, .login-form { display: flex; gap: 8px; margin-bottom: 20px; }
    .login-form { flex-direction: column; max-width: 300px; }
    .task-form input { flex: 1; padding: 8px; font-size: 14px; border: 1px solid #ccc; border-radius: 4px; }
    button { padding: 8px 16px; background: #4a90d9; color: white; border: none; border-radius: 4px; cursor: pointer; }
    .filter { margin-bottom: 12px; }
    .loading, .error { color: #999; font-style: italic; }
    .tasks { list-style: none; padding: 0; }
    .task-item { display: flex; align-items: center; gap: 8px; padding: 8px 0; border-bottom: 1px solid #eee; }
    .task-item label { flex: 1; }
    .task-item label.completed { text-decoration: line-through; color: #999; }
    .task-item button { background: #e74c3c; padding: 4px 10px; }
"#;

/// Root component: header, then the login form or the task list.
#[allow(non_snake_case)]
pub fn App() -> Element {
    let client = use_client();
    let mut user = use_logged_user(client.clone());
    let mut hide_completed = use_signal(|| false);
    let mut tasks_query = use_tasks_query(client.clone(), user);
    let status = use_task_status(client.clone(), user, hide_completed);

    let state = AppState {
        user: user(),
        hide_completed: hide_completed(),
        query: query_state(&tasks_query),
        status: status(),
    };
    let view = state.render();

    let body = match view.screen {
        Screen::Login => rsx! {
            LoginForm { on_login: move |logged_in| user.set(Some(logged_in)) }
        },
        Screen::Tasks(list) => {
            let logout = {
                let client = client.clone();
                move |_| {
                    client.logout();
                    user.set(None);
                }
            };
            let toggle_checked = {
                let client = client.clone();
                EventHandler::new(move |row: TaskRow| {
                    // fire and forget; the publication delivers the new flag
                    let _ = client.toggle_checked(&row);
                })
            };
            let error = list.error.clone();
            let delete_task = EventHandler::new(move |row: TaskRow| {
                let client = client.clone();
                spawn(async move {
                    match client.remove_task(&row).await {
                        Ok(()) => tasks_query.restart(),
                        Err(e) => log::error!("Failed to delete task: {}", e),
                    }
                });
            });

            rsx! {
                div { class: "user", onclick: logout, "{list.username} 🚪" }
                TaskForm { refetch: move |_| tasks_query.restart() }
                div { class: "filter",
                    button { onclick: move |_| hide_completed.set(!hide_completed()), "{list.filter_label}" }
                }
                if list.loading {
                    div { class: "loading", "loading..." }
                }
                {error.map(|message| rsx! { div { class: "error", "{message}" } })}
                ul { class: "tasks",
                    for row in list.tasks.iter() {
                        TaskItem {
                            key: "{row.id}",
                            task: row.clone(),
                            on_checkbox_click: toggle_checked,
                            on_delete_click: delete_task,
                        }
                    }
                }
            }
        }
    };

    rsx! {
        style { {STYLE} }
        div { class: "app",
            header {
                div { class: "app-bar",
                    div { class: "app-header",
                        h1 { "{view.title}" }
                    }
                }
            }
            div { class: "main", {body} }
        }
    }
}
