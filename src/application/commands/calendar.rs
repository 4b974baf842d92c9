use chrono::{Datelike, NaiveDate};
use clap::Args;
use std::collections::BTreeSet;

use crate::application::commands::utils::date_format::{parse_date, parse_month};
use crate::application::handlers::AppContext;
use crate::application::services::calendar_service::format_day_entry;

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Show the tasks due on this day (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date, conflicts_with = "month")]
    pub date: Option<NaiveDate>,

    /// Show a month grid (YYYY-MM) with days that have deadlines marked
    #[arg(long, value_parser = parse_month)]
    pub month: Option<(i32, u32)>,
}

pub fn run_calendar(ctx: &AppContext, args: CalendarArgs) -> anyhow::Result<()> {
    if let Some((year, month)) = args.month {
        let marked = ctx.calendar_service.dates_with_tasks(year, month);
        let grid = render_month(year, month, &marked)
            .ok_or_else(|| anyhow::anyhow!("Invalid month {}-{:02}", year, month))?;
        print!("{}", grid);
        return Ok(());
    }

    let date = args.date.unwrap_or_else(|| ctx.clock.now().date());
    let tasks = ctx.calendar_service.tasks_on(date);

    println!("📅 Tasks for {}:", date.format("%Y-%m-%d"));
    if tasks.is_empty() {
        println!("   Nothing due.");
    }
    for task in &tasks {
        println!("   #{} {}", task.id, format_day_entry(task));
    }
    Ok(())
}

/// Monday-first month grid; days in `marked` get a trailing `*`
fn render_month(year: i32, month: u32, marked: &BTreeSet<NaiveDate>) -> Option<String> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let mut out = format!("{}\n", first.format("%B %Y"));
    out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");

    let lead = first.weekday().num_days_from_monday() as usize;
    out.push_str(&"    ".repeat(lead));

    let mut column = lead;
    for day in first.iter_days().take_while(|d| d.month() == month) {
        let mark = if marked.contains(&day) { '*' } else { ' ' };
        out.push_str(&format!("{:>3}{}", day.day(), mark));
        column += 1;
        if column == 7 {
            out.truncate(out.trim_end().len());
            out.push('\n');
            column = 0;
        }
    }
    if column != 0 {
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    Some(out)
}
