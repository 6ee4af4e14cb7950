use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task};
use crate::recurrence::RecurrenceEngine;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod tasks;

/// Number of rows returned by list queries unless configured otherwise.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Storage operations for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError>;
    /// All tasks ordered by due date.
    async fn find_tasks(&self) -> Result<Vec<Task>, CoreError>;
    async fn find_tasks_by_date(&self, date: NaiveDate) -> Result<Vec<Task>, CoreError>;
    /// Tasks whose title or comment contains `text`, ignoring case.
    async fn find_tasks_by_text(&self, text: &str) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, task: &Task) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: i64) -> Result<(), CoreError>;
    /// Deletes a one-off task or moves a repeating one to its next
    /// occurrence after `today`, atomically.
    async fn complete_task(
        &self,
        id: i64,
        today: NaiveDate,
        engine: &RecurrenceEngine,
    ) -> Result<CompletionResult, CoreError>;
}

/// SQLite implementation of [`TaskRepository`].
pub struct SqliteRepository {
    pool: DbPool,
    list_limit: u32,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_list_limit(mut self, list_limit: u32) -> Self {
        self.list_limit = list_limit;
        self
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub(crate) fn list_limit(&self) -> i64 {
        i64::from(self.list_limit)
    }
}
