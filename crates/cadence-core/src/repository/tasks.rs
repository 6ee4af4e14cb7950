use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task};
use crate::recurrence::{format_date, RecurrenceEngine};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::NaiveDate;

const TASK_COLUMNS: &str = "id, date, title, comment, repeat";

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let task: Task = sqlx::query_as(&format!(
            r#"INSERT INTO scheduler (date, title, comment, repeat)
            VALUES ($1, $2, $3, $4)
            RETURNING {TASK_COLUMNS}"#
        ))
        .bind(data.date)
        .bind(data.title)
        .bind(data.comment)
        .bind(data.repeat)
        .fetch_one(self.pool())
        .await?;

        Ok(task)
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM scheduler WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(task)
    }

    async fn find_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM scheduler ORDER BY date, id LIMIT $1"
        ))
        .bind(self.list_limit())
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn find_tasks_by_date(&self, date: NaiveDate) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM scheduler WHERE date = $1 ORDER BY id LIMIT $2"
        ))
        .bind(format_date(date))
        .bind(self.list_limit())
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn find_tasks_by_text(&self, text: &str) -> Result<Vec<Task>, CoreError> {
        // SQLite's UPPER/LIKE only fold ASCII, so matching happens here.
        let tasks: Vec<Task> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM scheduler ORDER BY date, id"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(tasks
            .into_iter()
            .filter(|task| task.mentions(text))
            .take(self.list_limit() as usize)
            .collect())
    }

    async fn update_task(&self, task: &Task) -> Result<Task, CoreError> {
        let updated: Option<Task> = sqlx::query_as(&format!(
            r#"UPDATE scheduler
            SET date = $1, title = $2, comment = $3, repeat = $4
            WHERE id = $5
            RETURNING {TASK_COLUMNS}"#
        ))
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(task.id)
        .fetch_optional(self.pool())
        .await?;

        updated.ok_or_else(|| CoreError::NotFound(task.id.to_string()))
    }

    async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn complete_task(
        &self,
        id: i64,
        today: NaiveDate,
        engine: &RecurrenceEngine,
    ) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM scheduler WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let result = if task.is_recurring() {
            // An invalid rule aborts the transaction and leaves the task as is.
            let next = engine.next_date(today, &task.date, &task.repeat)?;

            let rescheduled: Task = sqlx::query_as(&format!(
                r#"UPDATE scheduler SET date = $1 WHERE id = $2
                RETURNING {TASK_COLUMNS}"#
            ))
            .bind(format_date(next))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            CompletionResult::Rescheduled(rescheduled)
        } else {
            sqlx::query("DELETE FROM scheduler WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            CompletionResult::Deleted(task)
        };

        tx.commit().await?;
        Ok(result)
    }
}
