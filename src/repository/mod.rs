use anyhow::Result;
use tracing::{debug, error};

use crate::{db::driver::Db, models::Todo};

/// Persists the whole todo list as one JSON array under a single key.
#[derive(Debug)]
pub struct TodoRepository {
    db: Db,
    key: String,
}
impl TodoRepository {
    pub fn new(db: Db, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the stored list.
    pub fn save(&self, todos: &[Todo]) -> Result<()> {
        self.db.insert(&self.key, &todos)?;
        debug!(key = %self.key, count = todos.len(), "saved todos");
        Ok(())
    }

    /// Read the stored list. Absent and unreadable values both yield an
    /// empty list.
    pub fn load(&self) -> Vec<Todo> {
        match self.db.get::<Vec<Todo>, _>(&self.key) {
            Ok(Some(todos)) => todos,
            Ok(None) => Vec::new(),
            Err(err) => {
                error!(key = %self.key, error = %err, "failed to parse stored todos");
                Vec::new()
            }
        }
    }

    /// Remove the key entirely.
    pub fn clear(&self) -> Result<()> {
        self.db.remove(&self.key)?;
        debug!(key = %self.key, "cleared todos");
        Ok(())
    }
}
