use cadence_core::models::Task;
use cadence_core::recurrence::RecurrenceRule;
use chrono::NaiveDate;
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};

pub fn display_tasks(tasks: &[Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Due", "Title", "Repeat", "Comment"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(task.id));
        row.add_cell(Cell::new(&task.date));
        row.add_cell(due_cell(task, today));

        let mut title = String::new();
        if task.is_recurring() {
            title.push('↻');
            title.push(' ');
        }
        title.push_str(&task.title);
        row.add_cell(Cell::new(title).add_attribute(Attribute::Bold));

        row.add_cell(Cell::new(describe_repeat(&task.repeat)));
        row.add_cell(Cell::new(&task.comment));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_task(task: &Task, today: NaiveDate) {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID"), Cell::new(task.id)]);
    table.add_row(vec![Cell::new("Title"), Cell::new(&task.title)]);
    table.add_row(vec![Cell::new("Date"), Cell::new(&task.date)]);
    table.add_row(vec![Cell::new("Due"), due_cell(task, today)]);
    table.add_row(vec![
        Cell::new("Repeat"),
        Cell::new(describe_repeat(&task.repeat)),
    ]);
    table.add_row(vec![Cell::new("Comment"), Cell::new(&task.comment)]);

    println!("{table}");
}

fn due_cell(task: &Task, today: NaiveDate) -> Cell {
    let Ok(due) = task.due_date() else {
        return Cell::new("invalid date").fg(Color::DarkGrey);
    };

    if due == today {
        Cell::new("today").fg(Color::Yellow)
    } else if due < today {
        Cell::new(HumanTime::from(due - today).to_string()).fg(Color::Red) // Overdue
    } else {
        Cell::new(HumanTime::from(due - today).to_string())
    }
}

/// Canonical form of a stored rule; unparseable rules are shown as stored.
fn describe_repeat(repeat: &str) -> String {
    if repeat.trim().is_empty() {
        return "-".to_string();
    }
    repeat
        .parse::<RecurrenceRule>()
        .map(|rule| rule.to_string())
        .unwrap_or_else(|_| repeat.to_string())
}
