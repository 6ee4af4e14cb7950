use anyhow::Result;
use cadence_core::repository::TaskRepository;
use cadence_core::service::TaskService;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;

pub async fn delete_task<R: TaskRepository>(service: &TaskService<R>, command: DeleteCommand) -> Result<()> {
    let task = service.find(command.id).await?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", task.title))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    service.delete(task.id).await?;
    println!("{} Deleted task: '{}'", "✓".green().bold(), task.title);

    Ok(())
}
