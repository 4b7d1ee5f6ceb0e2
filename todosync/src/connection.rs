use std::sync::Arc;

use sea_orm::{
    sea_query::SqliteQueryBuilder, ConnectOptions, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, DbErr, EntityTrait, ExecResult, QueryResult, Schema, Statement,
};
use tokio::sync::broadcast;

use crate::entity::{task, user};
use crate::messages::{ChangeNotification, WriteKind};
use crate::registry::TableRegistry;

/// Default capacity of the change notification channel.
pub const DEFAULT_CHANGE_CAPACITY: usize = 256;

/// A SeaORM connection wrapper that intercepts write operations and
/// broadcasts a [`ChangeNotification`] for every write to a watched table.
///
/// Cloning is cheap: clones share the pool, the channel and the registry.
#[derive(Clone)]
pub struct TaskStore {
    inner: DatabaseConnection,
    change_tx: broadcast::Sender<ChangeNotification>,
    registry: Arc<TableRegistry>,
}

impl TaskStore {
    /// Get a reference to the underlying SeaORM connection.
    /// Writes issued through it are not broadcast.
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Subscribe to the change notification stream.
    pub fn change_rx(&self) -> broadcast::Receiver<ChangeNotification> {
        self.change_tx.subscribe()
    }

    /// Register a table so its writes are broadcast.
    pub fn register_table(&self, table_name: &str) {
        self.registry.register(table_name);
    }

    /// Start building the schema.
    ///
    /// Returns a [`SchemaBuilder`] that lets you register multiple entities
    /// and then apply them all at once with `.sync().await`.
    pub fn schema(&self) -> SchemaBuilder<'_> {
        SchemaBuilder {
            store: self,
            entries: Vec::new(),
        }
    }

    /// Create the `users` and `tasks` tables. Only `tasks` is watched;
    /// account writes never reach the change stream.
    pub async fn install_schema(&self) -> Result<(), DbErr> {
        self.schema()
            .register_local(user::Entity)
            .register(task::Entity)
            .sync()
            .await
    }

    /// Try to classify a SQL statement as a write and extract the table name.
    pub(crate) fn classify_write(sql: &str) -> Option<(WriteKind, String)> {
        let trimmed = sql.trim_start().to_uppercase();
        let parts: Vec<&str> = sql.split_whitespace().collect();
        let (kind, index) = if trimmed.starts_with("INSERT") {
            // INSERT INTO <table> ...
            (WriteKind::Insert, 2)
        } else if trimmed.starts_with("UPDATE") {
            (WriteKind::Update, 1)
        } else if trimmed.starts_with("DELETE") {
            // DELETE FROM <table> ...
            (WriteKind::Delete, 2)
        } else {
            return None;
        };
        // INSERT INTO "tasks"("_id", ...) has no space before the column list
        let table = parts.get(index)?.split('(').next()?;
        Some((kind, table.trim_matches('"').trim_matches('`').to_string()))
    }

    /// After a successful write, broadcast a notification if the table is watched.
    fn dispatch_change(&self, kind: WriteKind, table: &str) {
        if !self.registry.is_registered(table) {
            return;
        }
        log::debug!("change on {}: {}", table, kind.as_str());
        // No receivers is fine: nobody is subscribed yet.
        let _ = self.change_tx.send(ChangeNotification::new(table, kind));
    }

    fn observe(&self, sql: &str) {
        if let Some((kind, table)) = Self::classify_write(sql) {
            self.dispatch_change(kind, &table);
        }
    }
}

impl ConnectionTrait for TaskStore {
    fn get_database_backend(&self) -> DatabaseBackend {
        self.inner.get_database_backend()
    }

    fn execute_raw<'life0, 'async_trait>(
        &'life0 self,
        stmt: Statement,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ExecResult, DbErr>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        let sql = stmt.to_string();
        Box::pin(async move {
            let result = self.inner.execute_raw(stmt).await?;
            self.observe(&sql);
            Ok(result)
        })
    }

    fn execute_unprepared<'life0, 'life1, 'async_trait>(
        &'life0 self,
        sql: &'life1 str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ExecResult, DbErr>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let sql_owned = sql.to_string();
        Box::pin(async move {
            let result = self.inner.execute_unprepared(&sql_owned).await?;
            self.observe(&sql_owned);
            Ok(result)
        })
    }

    fn query_one_raw<'life0, 'async_trait>(
        &'life0 self,
        stmt: Statement,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<Option<QueryResult>, DbErr>>
                + Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        // SeaORM uses query_one_raw for INSERT ... RETURNING, so writes show up here too
        let sql = stmt.to_string();
        Box::pin(async move {
            let result = self.inner.query_one_raw(stmt).await?;
            self.observe(&sql);
            Ok(result)
        })
    }

    fn query_all_raw<'life0, 'async_trait>(
        &'life0 self,
        stmt: Statement,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<Vec<QueryResult>, DbErr>>
                + Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        let sql = stmt.to_string();
        Box::pin(async move {
            let result = self.inner.query_all_raw(stmt).await?;
            self.observe(&sql);
            Ok(result)
        })
    }
}

/// Builder for declaring which entities exist and which are watched.
///
/// Created via [`TaskStore::schema()`]. Tables are created in registration
/// order, so register referenced tables first.
///
/// # Example
///
/// ```ignore
/// store.schema()
///     .register_local(user::Entity)
///     .register(task::Entity)
///     .sync()
///     .await?;
/// ```
pub struct SchemaBuilder<'a> {
    store: &'a TaskStore,
    entries: Vec<EntityEntry>,
}

struct EntityEntry {
    create_sql: String,
    table_name: String,
    watched: bool,
}

impl<'a> SchemaBuilder<'a> {
    /// Register an entity whose writes are broadcast on the change stream.
    pub fn register<E: EntityTrait>(mut self, _entity: E) -> Self {
        self.push_entity::<E>(true);
        self
    }

    /// Register an entity whose table is created but never broadcast.
    pub fn register_local<E: EntityTrait>(mut self, _entity: E) -> Self {
        self.push_entity::<E>(false);
        self
    }

    /// Create all registered tables and start watching the broadcast ones.
    pub async fn sync(self) -> Result<(), DbErr> {
        for entry in self.entries {
            self.store.inner.execute_unprepared(&entry.create_sql).await?;
            if entry.watched {
                self.store.register_table(&entry.table_name);
            }
        }
        Ok(())
    }

    fn push_entity<E: EntityTrait>(&mut self, watched: bool) {
        let backend = self.store.get_database_backend();
        let schema = Schema::new(backend);
        let create_sql = schema
            .create_table_from_entity(E::default())
            .if_not_exists()
            .to_owned()
            .to_string(SqliteQueryBuilder);

        self.entries.push(EntityEntry {
            create_sql,
            table_name: E::default().table_name().to_string(),
            watched,
        });
    }
}

/// Builder for [`TaskStore`].
pub struct TaskStoreBuilder {
    database_url: String,
    change_capacity: usize,
}

impl TaskStoreBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            database_url: url.to_string(),
            change_capacity: DEFAULT_CHANGE_CAPACITY,
        }
    }

    /// Capacity of the change notification channel. Subscribers that fall
    /// further behind than this re-query instead of replaying.
    pub fn with_change_capacity(mut self, capacity: usize) -> Self {
        self.change_capacity = capacity.max(1);
        self
    }

    /// Connect, create the schema and return the store.
    pub async fn build(self) -> Result<TaskStore, DbErr> {
        let mut opts = ConnectOptions::new(&self.database_url);
        // Every pooled connection to an in-memory SQLite database gets its own database
        if self.database_url.contains(":memory:") {
            opts.max_connections(1);
        }
        opts.sqlx_logging(false);
        let inner = Database::connect(opts).await?;

        let (change_tx, _) = broadcast::channel::<ChangeNotification>(self.change_capacity);

        let store = TaskStore {
            inner,
            change_tx,
            registry: Arc::new(TableRegistry::new()),
        };
        store.install_schema().await?;
        log::info!("task store ready at {}", self.database_url);

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quoted_insert() {
        let sql = r#"INSERT INTO "tasks" ("_id", "text") VALUES ('1', 'a') RETURNING "_id""#;
        assert_eq!(
            TaskStore::classify_write(sql),
            Some((WriteKind::Insert, "tasks".to_string()))
        );
    }

    #[test]
    fn test_classify_insert_without_space_before_columns() {
        let sql = r#"INSERT INTO "tasks"("_id") VALUES ('1')"#;
        assert_eq!(
            TaskStore::classify_write(sql),
            Some((WriteKind::Insert, "tasks".to_string()))
        );
    }

    #[test]
    fn test_classify_update_and_delete() {
        assert_eq!(
            TaskStore::classify_write(r#"UPDATE "tasks" SET "is_checked" = TRUE"#),
            Some((WriteKind::Update, "tasks".to_string()))
        );
        assert_eq!(
            TaskStore::classify_write(r#"  delete FROM `tasks` WHERE 1"#),
            Some((WriteKind::Delete, "tasks".to_string()))
        );
    }

    #[test]
    fn test_classify_ignores_reads_and_ddl() {
        assert_eq!(TaskStore::classify_write(r#"SELECT * FROM "tasks""#), None);
        assert_eq!(
            TaskStore::classify_write(r#"CREATE TABLE IF NOT EXISTS "tasks" ()"#),
            None
        );
    }
}
