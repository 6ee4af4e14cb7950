use anyhow::Result;
use cadence_core::repository::TaskRepository;
use cadence_core::service::TaskService;

use crate::cli::ShowCommand;
use crate::views::table::display_task;

pub async fn show_task<R: TaskRepository>(service: &TaskService<R>, command: ShowCommand) -> Result<()> {
    let task = service.find(command.id).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        display_task(&task, service.today());
    }

    Ok(())
}
