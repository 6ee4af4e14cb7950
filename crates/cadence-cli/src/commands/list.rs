use anyhow::Result;
use cadence_core::repository::TaskRepository;
use cadence_core::service::TaskService;
use serde_json::json;

use crate::cli::ListCommand;
use crate::views::table::display_tasks;

pub async fn list_tasks<R: TaskRepository>(service: &TaskService<R>, command: ListCommand) -> Result<()> {
    let tasks = service.search(&command.query).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&json!({ "tasks": tasks }))?);
    } else {
        display_tasks(&tasks, service.today());
    }

    Ok(())
}
