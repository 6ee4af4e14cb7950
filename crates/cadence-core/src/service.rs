//! Task operations that combine storage with the recurrence engine.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task, TaskSearch, UpdateTaskData};
use crate::recurrence::{format_date, parse_date, RecurrenceEngine};
use crate::repository::TaskRepository;

/// Validates task writes and keeps repeating tasks on schedule.
///
/// "Today" is the local calendar date unless pinned with
/// [`TaskService::with_today`]. Its year is also the calendar year handed to
/// the recurrence engine.
pub struct TaskService<R> {
    repo: R,
    today: Option<NaiveDate>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, today: None }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn engine(&self) -> RecurrenceEngine {
        RecurrenceEngine::with_year(self.today().year())
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Adds a task.
    ///
    /// An empty date means today. A rule, when present, must evaluate. A
    /// date already in the past is moved to the rule's next occurrence, or
    /// to today for one-off tasks.
    pub async fn create(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("task title is required".to_string()));
        }

        let today = self.today();
        let date = if data.date.trim().is_empty() {
            format_date(today)
        } else {
            data.date.trim().to_string()
        };
        let due = parse_date(&date)?;

        let next = if data.repeat.trim().is_empty() {
            today
        } else {
            self.engine().next_date(today, &date, &data.repeat)?
        };

        let date = if due < today { format_date(next) } else { date };

        let task = self
            .repo
            .add_task(NewTaskData {
                title: title.to_string(),
                date,
                comment: data.comment,
                repeat: data.repeat.trim().to_string(),
            })
            .await?;

        tracing::info!(id = task.id, date = %task.date, repeat = %task.repeat, "task created");
        Ok(task)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Task>, CoreError> {
        match TaskSearch::from(query) {
            TaskSearch::All => self.repo.find_tasks().await,
            TaskSearch::Date(date) => self.repo.find_tasks_by_date(date).await,
            TaskSearch::Text(text) => self.repo.find_tasks_by_text(&text).await,
        }
    }

    pub async fn find(&self, id: i64) -> Result<Task, CoreError> {
        self.repo
            .find_task_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// Changes a task. The merged task must still have a title, a valid
    /// date and, if repeating, a rule that evaluates.
    pub async fn update(&self, id: i64, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut task = data.apply_to(self.find(id).await?);
        task.title = task.title.trim().to_string();
        task.date = task.date.trim().to_string();
        task.repeat = task.repeat.trim().to_string();

        if task.title.is_empty() {
            return Err(CoreError::InvalidInput("task title is required".to_string()));
        }
        parse_date(&task.date)?;
        if task.is_recurring() {
            self.engine().next_date(self.today(), &task.date, &task.repeat)?;
        }

        let task = self.repo.update_task(&task).await?;
        tracing::info!(id = task.id, date = %task.date, "task updated");
        Ok(task)
    }

    /// Marks a task done: one-off tasks are deleted, repeating tasks move
    /// to their next occurrence.
    pub async fn complete(&self, id: i64) -> Result<CompletionResult, CoreError> {
        let result = self
            .repo
            .complete_task(id, self.today(), &self.engine())
            .await?;

        match &result {
            CompletionResult::Deleted(task) => {
                tracing::info!(id = task.id, "one-off task completed and removed")
            }
            CompletionResult::Rescheduled(task) => {
                tracing::info!(id = task.id, date = %task.date, "repeating task rescheduled")
            }
        }
        Ok(result)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_task(id).await?;
        tracing::info!(id, "task deleted");
        Ok(())
    }
}
