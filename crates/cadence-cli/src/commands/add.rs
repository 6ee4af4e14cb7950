use anyhow::Result;
use cadence_core::models::NewTaskData;
use cadence_core::repository::TaskRepository;
use cadence_core::service::TaskService;
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::parser::parse_due_date;

pub async fn add_task<R: TaskRepository>(service: &TaskService<R>, command: AddCommand) -> Result<()> {
    let date = command
        .date
        .as_deref()
        .map(|d| parse_due_date(d, service.today()))
        .transpose()?
        .unwrap_or_default();

    let new_task_data = NewTaskData {
        title: command.title,
        date,
        comment: command.comment.unwrap_or_default(),
        repeat: command.repeat.unwrap_or_default(),
    };

    let task = service.create(new_task_data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().cyan();

    println!("{} Created task: {}", "✓".style(success_style), task.title.bold());
    println!("  {} Task ID: {}", "→".style(info_style), task.id);
    println!("  {} Due: {}", "→".style(info_style), task.date);
    if task.is_recurring() {
        println!("  {} Repeats: {}", "↻".style(info_style), task.repeat);
    }

    Ok(())
}
