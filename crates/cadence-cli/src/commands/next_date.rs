use anyhow::Result;
use cadence_core::recurrence::{format_date, RecurrenceEngine};
use chrono::{Datelike, Local, NaiveDate};

use crate::cli::NextDateCommand;
use crate::parser::parse_day;

/// Prints the next occurrence as `YYYYMMDD`. Needs no database.
pub fn next_date(command: NextDateCommand, today: Option<NaiveDate>) -> Result<()> {
    let now = match command.now.as_deref() {
        Some(now) => parse_day(now)?,
        None => today.unwrap_or_else(|| Local::now().date_naive()),
    };

    let engine = match command.year.or(today.map(|t| t.year())) {
        Some(year) => RecurrenceEngine::with_year(year),
        None => RecurrenceEngine::new(),
    };

    let next = engine.next_date(now, &command.date, &command.repeat)?;
    println!("{}", format_date(next));

    Ok(())
}
