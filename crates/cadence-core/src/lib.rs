//! # Cadence Core Library
//!
//! A small task scheduler built around a recurrence-rule engine. Tasks carry
//! a `YYYYMMDD` due date and an optional rule such as `d 7`, `w 1,5` or
//! `m 1,-1 3,6`; completing a repeating task moves it to the rule's next
//! occurrence.
//!
//! ## Core Modules
//!
//! - [`recurrence`]: rule grammar and next-occurrence calculation
//! - [`service`]: task operations that validate rules and roll tasks forward
//! - [`repository`]: data access layer with Repository pattern
//! - [`models`]: core data structures and transfer objects
//! - [`db`]: database connection and migration management
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db, models::NewTaskData, repository::SqliteRepository, service::TaskService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let service = TaskService::new(SqliteRepository::new(pool));
//!
//!     let task = service
//!         .create(NewTaskData {
//!             title: "Water the plants".to_string(),
//!             repeat: "d 3".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created task {} due {}", task.id, task.date);
//!
//!     Ok(())
//! }
//! ```
//!
//! The engine can also be used on its own:
//!
//! ```rust
//! use cadence_core::recurrence::{parse_date, RecurrenceEngine};
//!
//! let now = parse_date("20230315").unwrap();
//! let next = RecurrenceEngine::with_year(2023)
//!     .next_date_string(now, "20230301", "m -1")
//!     .unwrap();
//! assert_eq!(next, "20230331");
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod service;
