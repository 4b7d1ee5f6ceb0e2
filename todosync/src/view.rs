//! Client-side state container for the task screen.
//!
//! The screen draws on two sources with different latency: the live
//! publication (authoritative completion flags, pushed) and the GraphQL
//! `tasks` query (task text, pulled and refetched after mutations).
//! [`merge_tasks`] is the single place where the two are reconciled, and
//! [`AppState::render`] turns the combined state into what the UI draws.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::task;
use crate::publication::LiveSnapshot;

pub const APP_TITLE: &str = "📝️ To Do List";

/// A task as fetched by the `tasks` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// A completion flag as published by the live subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub id: String,
    pub is_checked: bool,
}

impl From<&task::Model> for TaskStatus {
    fn from(model: &task::Model) -> Self {
        Self {
            id: model.id.clone(),
            is_checked: model.is_checked,
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub text: String,
    /// `None` when the publication has no entry for this task.
    pub is_checked: Option<bool>,
}

impl TaskRow {
    /// Completion for display; an unknown flag shows as unchecked.
    pub fn checked(&self) -> bool {
        self.is_checked.unwrap_or(false)
    }
}

/// Attach the published completion flag to every fetched task, by id.
///
/// The fetched list decides which rows exist and in what order.
pub fn merge_tasks(fetched: &[TaskSummary], status: &[TaskStatus]) -> Vec<TaskRow> {
    let flags: HashMap<&str, bool> = status
        .iter()
        .map(|s| (s.id.as_str(), s.is_checked))
        .collect();

    fetched
        .iter()
        .map(|summary| TaskRow {
            id: summary.id.clone(),
            text: summary.text.clone().unwrap_or_default(),
            is_checked: flags.get(summary.id.as_str()).copied(),
        })
        .collect()
}

/// `📝️ To Do List`, with ` (N)` appended while N tasks are pending.
pub fn header_title(pending_count: u64) -> String {
    if pending_count > 0 {
        format!("{} ({})", APP_TITLE, pending_count)
    } else {
        APP_TITLE.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// State of the query source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub loading: bool,
    pub tasks: Option<Vec<TaskSummary>>,
}

impl QueryState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            tasks: None,
        }
    }

    pub fn loaded(tasks: Vec<TaskSummary>) -> Self {
        Self {
            loading: false,
            tasks: Some(tasks),
        }
    }
}

/// State of the live publication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusState {
    pub ready: bool,
    pub tasks: Vec<TaskStatus>,
    pub pending_count: u64,
    pub error: Option<String>,
}

impl StatusState {
    /// A publication that could not be opened or loaded.
    pub fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }
}

impl From<&LiveSnapshot> for StatusState {
    fn from(snapshot: &LiveSnapshot) -> Self {
        Self {
            ready: snapshot.ready,
            tasks: snapshot.tasks.iter().map(TaskStatus::from).collect(),
            pending_count: snapshot.pending_count,
            error: snapshot.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub user: Option<ViewUser>,
    pub hide_completed: bool,
    pub query: QueryState,
    pub status: StatusState,
}

/// What the root component draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppView {
    pub title: String,
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Tasks(TaskListView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub username: String,
    pub filter_label: &'static str,
    pub loading: bool,
    /// Why the live publication is not delivering, if it failed.
    pub error: Option<String>,
    pub tasks: Vec<TaskRow>,
}

impl AppState {
    pub fn toggle_hide_completed(&mut self) {
        self.hide_completed = !self.hide_completed;
    }

    /// Loading while either source has not delivered yet. A failed
    /// publication reports its error instead.
    pub fn is_loading(&self) -> bool {
        let status_pending = !self.status.ready && self.status.error.is_none();
        self.user.is_some() && (status_pending || self.query.loading)
    }

    pub fn render(&self) -> AppView {
        let Some(user) = &self.user else {
            return AppView {
                title: header_title(0),
                screen: Screen::Login,
            };
        };

        let fetched = self.query.tasks.as_deref().unwrap_or_default();
        AppView {
            title: header_title(self.status.pending_count),
            screen: Screen::Tasks(TaskListView {
                username: user.username.clone().unwrap_or_default(),
                filter_label: filter_label(self.hide_completed),
                loading: self.is_loading(),
                error: self.status.error.clone(),
                tasks: merge_tasks(fetched, &self.status.tasks),
            }),
        }
    }
}

pub fn filter_label(hide_completed: bool) -> &'static str {
    if hide_completed {
        "Show All"
    } else {
        "Hide Completed"
    }
}
