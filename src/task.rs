//! Task records and their store access.
//!
//! Tasks are an independent entity the timer only references by id; nothing
//! here touches timer state. The store writes whole-list replacements
//! (clear, then put each record) so the persisted list always mirrors what
//! the shell last rendered.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::storage::{Database, StoreKind};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_active: false,
            is_completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Typed access to the `tasks` store.
#[derive(Clone)]
pub struct TaskStore {
    db: Arc<Mutex<Database>>,
}

impl TaskStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Replace the persisted list with `tasks`.
    ///
    /// # Errors
    /// Returns an error if the store rejects the write.
    pub fn save_all(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let db = self.lock();
        db.clear(StoreKind::Tasks)?;
        for task in tasks {
            let json = serde_json::to_string(task)?;
            db.put(StoreKind::Tasks, &task.id.to_string(), &json)?;
        }
        Ok(())
    }

    /// Load every persisted task. Records that no longer decode are dropped
    /// with a warning rather than failing the whole list.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub fn load_all(&self) -> Result<Vec<Task>, StoreError> {
        let values = self.lock().get_all(StoreKind::Tasks)?;
        let mut tasks = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_str::<Task>(&value) {
                Ok(task) => tasks.push(task),
                Err(e) => log::warn!("dropping unreadable task record: {e}"),
            }
        }
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    /// Remove one task by id.
    ///
    /// # Errors
    /// Returns an error if the store rejects the delete.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.lock().delete(StoreKind::Tasks, &id.to_string())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> TaskStore {
        TaskStore::new(Arc::new(Mutex::new(Database::open_memory().unwrap())))
    }

    #[test]
    fn save_all_replaces_previous_list() {
        let store = memory_store();
        store
            .save_all(&[Task::new(1, "write tests"), Task::new(2, "take a break")])
            .unwrap();
        store.save_all(&[Task::new(3, "only survivor")]).unwrap();
        let tasks = store.load_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 3);
        assert_eq!(tasks[0].text, "only survivor");
    }

    #[test]
    fn load_all_sorts_by_id() {
        let store = memory_store();
        store
            .save_all(&[Task::new(10, "b"), Task::new(2, "a"), Task::new(30, "c")])
            .unwrap();
        let ids: Vec<i64> = store.load_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 10, 30]);
    }

    #[test]
    fn delete_removes_single_task() {
        let store = memory_store();
        store
            .save_all(&[Task::new(1, "keep"), Task::new(2, "drop")])
            .unwrap();
        store.delete(2).unwrap();
        let tasks = store.load_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
    }

    #[test]
    fn task_json_uses_camel_case() {
        let json = serde_json::to_value(Task::new(1, "x")).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("isActive"));
        assert!(obj.contains_key("isCompleted"));
        assert!(obj.contains_key("createdAt"));
    }
}
