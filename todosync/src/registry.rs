//! Table registry for tracking which tables feed the change stream.
//!
//! The [`TableRegistry`] is the lookup used by [`TaskStore`](crate::TaskStore) to
//! decide whether a write should be broadcast. Tables are registered through
//! [`SchemaBuilder::register()`](crate::SchemaBuilder::register); tables added with
//! [`register_local()`](crate::SchemaBuilder::register_local) are created but stay silent.

use std::collections::HashSet;
use std::sync::RwLock;

/// Names of the tables whose writes are broadcast.
///
/// Thread-safe via interior `RwLock`; shared by every clone of the store.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashSet<String>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start broadcasting writes to `table_name`. Registering twice is a no-op.
    pub fn register(&self, table_name: &str) {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table_name.to_string());
        }
    }

    /// Check whether writes to a table are broadcast.
    pub fn is_registered(&self, table_name: &str) -> bool {
        self.tables
            .read()
            .map(|tables| tables.contains(table_name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table_is_not_registered() {
        let registry = TableRegistry::new();
        assert!(!registry.is_registered("tasks"));
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = TableRegistry::new();
        registry.register("tasks");
        registry.register("tasks");

        assert!(registry.is_registered("tasks"));
        assert!(!registry.is_registered("users"));
    }
}
