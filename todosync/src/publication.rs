//! Live, push-updated task publication.
//!
//! [`subscribe`] spawns a task that loads the caller's tasks once, then
//! re-queries whenever a [`ChangeNotification`](crate::ChangeNotification) for
//! the `tasks` table arrives, whether the write came from this client or any
//! other. Snapshots are published through a `watch` channel, so a slow reader
//! only ever sees the latest state. A failed load is published as an error on
//! the current snapshot and retried on the next notification.

use futures::Stream;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::context::RequestContext;
use crate::entity::task;
use crate::error::{Result, TaskError};
use crate::resolvers::owned_tasks;
use crate::TaskStore;

pub const TASKS_TABLE: &str = "tasks";

/// Which of the caller's tasks the publication carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Leave checked tasks out of the snapshot.
    pub hide_completed: bool,
}

/// The state of a publication at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSnapshot {
    /// False until the first load has completed.
    pub ready: bool,
    /// Matching tasks, newest first.
    pub tasks: Vec<task::Model>,
    /// Unchecked tasks owned by the caller, independent of the filter.
    pub pending_count: u64,
    /// Set when the latest load failed; `tasks` then holds the last good state.
    pub error: Option<String>,
}

/// Handle to a running publication. Dropping it stops the publication.
pub struct LiveTasks {
    rx: watch::Receiver<LiveSnapshot>,
    handle: JoinHandle<()>,
}

impl LiveTasks {
    /// The latest snapshot.
    pub fn snapshot(&self) -> LiveSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait until a snapshot newer than the last one seen is published.
    pub async fn changed(&mut self) -> Result<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| TaskError::Query("task publication stopped".into()))
    }

    /// Wait until the published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&LiveSnapshot) -> bool,
    ) -> Result<LiveSnapshot> {
        self.rx
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(|_| TaskError::Query("task publication stopped".into()))
    }

    /// Snapshots this handle has not seen yet, as they are published.
    /// The stream ends when the publication stops.
    pub fn into_stream(self) -> impl Stream<Item = LiveSnapshot> + Send {
        futures::stream::unfold(self, |mut live| async move {
            live.rx.changed().await.ok()?;
            let snapshot = live.rx.borrow_and_update().clone();
            Some((snapshot, live))
        })
    }
}

impl Drop for LiveTasks {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start publishing the caller's tasks. Must be called inside a tokio runtime.
pub fn subscribe(store: &TaskStore, ctx: &RequestContext, filter: TaskFilter) -> Result<LiveTasks> {
    let user_id = ctx.require_user()?.to_string();
    let store = store.clone();
    let (tx, rx) = watch::channel(LiveSnapshot::default());

    // Subscribe before the first load so no write slips in between.
    let mut changes = store.change_rx();

    let handle = tokio::spawn(async move {
        refresh(&store, &user_id, filter, &tx).await;
        loop {
            match changes.recv().await {
                Ok(notification) if !notification.touches(TASKS_TABLE) => continue,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("task publication lagged by {} notifications", skipped);
                }
                Err(RecvError::Closed) => break,
            }
            if tx.is_closed() {
                break;
            }
            refresh(&store, &user_id, filter, &tx).await;
        }
        log::debug!("task publication for {} stopped", user_id);
    });

    Ok(LiveTasks { rx, handle })
}

async fn refresh(
    store: &TaskStore,
    user_id: &str,
    filter: TaskFilter,
    tx: &watch::Sender<LiveSnapshot>,
) {
    match load_snapshot(store, user_id, filter).await {
        Ok(snapshot) => {
            let _ = tx.send(snapshot);
        }
        Err(e) => {
            log::error!("Failed to refresh task publication: {}", e);
            tx.send_modify(|snapshot| snapshot.error = Some(e.to_string()));
        }
    }
}

async fn load_snapshot(
    store: &TaskStore,
    user_id: &str,
    filter: TaskFilter,
) -> Result<LiveSnapshot> {
    let mut query = owned_tasks(user_id);
    if filter.hide_completed {
        query = query.filter(task::Column::IsChecked.eq(false));
    }
    let tasks = query.all(store).await?;

    let pending_count = task::Entity::find()
        .filter(task::Column::UserId.eq(user_id))
        .filter(task::Column::IsChecked.eq(false))
        .count(store)
        .await?;

    Ok(LiveSnapshot {
        ready: true,
        tasks,
        pending_count,
        error: None,
    })
}
