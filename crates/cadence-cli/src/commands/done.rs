use anyhow::Result;
use cadence_core::models::CompletionResult;
use cadence_core::repository::TaskRepository;
use cadence_core::service::TaskService;
use owo_colors::OwoColorize;

use crate::cli::DoneCommand;

pub async fn done_task<R: TaskRepository>(service: &TaskService<R>, command: DoneCommand) -> Result<()> {
    match service.complete(command.id).await? {
        CompletionResult::Deleted(task) => {
            println!("{} Completed task: '{}'", "✓".green().bold(), task.title);
        }
        CompletionResult::Rescheduled(task) => {
            println!(
                "{} Completed '{}', next due {}",
                "↻".cyan().bold(),
                task.title,
                task.date.bold()
            );
        }
    }

    Ok(())
}
