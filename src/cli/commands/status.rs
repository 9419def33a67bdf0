use crate::cli::commands::report;
use crate::core::calculator::calc_work_and_diff;
use crate::core::context::AppContext;
use crate::core::lifecycle::{ClockLogic, TodayState};
use crate::errors::AppResult;
use crate::utils::colors::{GREEN, RED, RESET, YELLOW, color_for_diff, colorize_optional};
use crate::utils::date;
use crate::utils::formatting::{diff_label, format_date, format_time, format_work};

/// Today's screen: date, state badge, times, work and diff.
pub fn handle(ctx: &AppContext) -> AppResult<()> {
    let today = date::today();
    let Some(state) = report(ClockLogic::today_state(ctx, today))? else {
        return Ok(());
    };

    let badge = match &state {
        TodayState::None => format!("{YELLOW}Not clocked in{RESET}"),
        TodayState::Working(_) => format!("{GREEN}Working{RESET}"),
        TodayState::Done(_) => format!("{RED}Done{RESET}"),
    };

    println!("📅 {}  {}", format_date(today), badge);

    let session = state.session();
    let work = session.map(calc_work_and_diff).unwrap_or_default();

    println!("In   : {}", colorize_optional(&format_time(session.and_then(|s| s.start_at))));
    println!("Out  : {}", colorize_optional(&format_time(session.and_then(|s| s.end_at))));
    println!("Work : {}", colorize_optional(&format_work(work.work_minutes)));
    println!(
        "Diff : {}{}{}",
        color_for_diff(work.diff_minutes),
        diff_label(work.diff_minutes),
        RESET
    );

    if let TodayState::Working(s) = &state
        && s.work_date != today
    {
        println!("\n⚠️  Open session from {}: clock out first.", s.work_date_str());
    }

    Ok(())
}
