use anyhow::Result;
use cadence_core::models::UpdateTaskData;
use cadence_core::repository::TaskRepository;
use cadence_core::service::TaskService;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::parser::parse_due_date;

pub async fn edit_task<R: TaskRepository>(service: &TaskService<R>, command: EditCommand) -> Result<()> {
    let date = command
        .date
        .as_deref()
        .map(|d| parse_due_date(d, service.today()))
        .transpose()?;

    let repeat = if command.repeat_clear {
        Some(String::new())
    } else {
        command.repeat
    };

    let update_data = UpdateTaskData {
        title: command.title,
        date,
        comment: command.comment,
        repeat,
    };

    let task = service.update(command.id, update_data).await?;
    println!("{} Updated task {}: {}", "✓".green().bold(), task.id, task.title.bold());

    Ok(())
}
