use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use sqlx::FromRow;

use crate::recurrence::{parse_date, RecurrenceError};

/// Date format accepted by task searches, e.g. `15.03.2023`.
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// A scheduled task.
///
/// `date` is the next due date as `YYYYMMDD`; `repeat` is the raw
/// recurrence rule and is empty for one-off tasks. The identifier is
/// serialized as a string.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    #[serde_as(as = "DisplayFromStr")]
    pub id: i64,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        !self.repeat.trim().is_empty()
    }

    pub fn due_date(&self) -> Result<NaiveDate, RecurrenceError> {
        parse_date(&self.date)
    }

    /// Whether the title or comment contains `text`, ignoring case for all
    /// Unicode letters.
    pub fn mentions(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.comment.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTaskData {
    pub title: String,
    /// `YYYYMMDD`; empty means today.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub date: Option<String>,
    pub comment: Option<String>,
    /// `Some("")` removes the recurrence.
    pub repeat: Option<String>,
}

impl UpdateTaskData {
    /// Applies the changes on top of an existing task.
    pub fn apply_to(self, mut task: Task) -> Task {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(comment) = self.comment {
            task.comment = comment;
        }
        if let Some(repeat) = self.repeat {
            task.repeat = repeat;
        }
        task
    }
}

#[derive(Debug)]
pub enum CompletionResult {
    /// A one-off task was removed.
    Deleted(Task),
    /// A repeating task was moved to its next occurrence.
    Rescheduled(Task),
}

/// What a task search looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSearch {
    All,
    Date(NaiveDate),
    /// Case-insensitive substring of the title or comment.
    Text(String),
}

impl From<&str> for TaskSearch {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            TaskSearch::All
        } else if let Ok(date) = NaiveDate::parse_from_str(s, SEARCH_DATE_FORMAT) {
            TaskSearch::Date(date)
        } else {
            TaskSearch::Text(s.to_string())
        }
    }
}
