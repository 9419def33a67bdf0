use crate::cli::commands::report;
use crate::cli::parser::Commands;
use crate::core::context::AppContext;
use crate::core::report::ReportLogic;
use crate::errors::{AppError, AppResult};
use crate::models::month_summary::MonthSummary;
use crate::utils::colors::{RESET, color_for_diff, colorize_optional};
use crate::utils::date::{current_month, parse_month};
use crate::utils::formatting::{bold, format_date, format_diff, format_hm, format_time, format_work};
use crate::utils::table::{Column, Table};

/// Handle the `month` command
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    let Commands::Month { period, json } = cmd else {
        return Ok(());
    };

    let (year, month) = match period {
        Some(p) => parse_month(p)?,
        None => current_month(),
    };

    let Some(summary) = report(ReportLogic::month(ctx, year, month))? else {
        return Ok(());
    };

    if *json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", out);
    } else {
        print_table(&summary);
    }

    Ok(())
}

fn print_table(summary: &MonthSummary) {
    println!("📅 {}", bold(&format!("{}-{:02}", summary.year, summary.month)));

    if summary.rows.is_empty() {
        println!("No sessions recorded.");
    } else {
        let mut table = Table::new(vec![
            Column::new("Date", 10),
            Column::new("In", 5),
            Column::new("Out", 5),
            Column::new("Work", 6),
            Column::new("Diff", 6),
        ]);

        for row in &summary.rows {
            let diff = format_diff(row.work.diff_minutes);
            table.add_row(vec![
                format_date(row.session.work_date),
                colorize_optional(&format_time(row.session.start_at)),
                colorize_optional(&format_time(row.session.end_at)),
                colorize_optional(&format_work(row.work.work_minutes)),
                format!("{}{}{}", color_for_diff(row.work.diff_minutes), diff, RESET),
            ]);
        }

        print!("{}", table.render());
    }

    println!();
    println!(
        "Overtime : {}  Undertime : {}",
        format_hm(summary.overtime_minutes),
        format_hm(summary.undertime_minutes)
    );
}
