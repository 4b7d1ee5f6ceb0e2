//! Change feed messages.
//!
//! Every successful write against a watched table produces one
//! [`ChangeNotification`] on the store's broadcast channel. Live publications
//! use these to decide when to re-query.

use serde::{Deserialize, Serialize};

/// The type of write that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

impl WriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Insert => "insert",
            WriteKind::Update => "update",
            WriteKind::Delete => "delete",
        }
    }
}

/// Lightweight event emitted after every write to a watched table.
///
/// Carries no row data; subscribers re-query what they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// The table that was written (e.g. `"tasks"`).
    pub table: String,
    /// What kind of write happened.
    pub kind: WriteKind,
}

impl ChangeNotification {
    pub fn new(table: impl Into<String>, kind: WriteKind) -> Self {
        Self {
            table: table.into(),
            kind,
        }
    }

    /// True if this notification concerns `table`.
    pub fn touches(&self, table: &str) -> bool {
        self.table == table
    }
}
