use crate::cli::commands::report;
use crate::cli::parser::Commands;
use crate::core::context::AppContext;
use crate::core::lifecycle::ClockLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::date;
use crate::utils::formatting::format_time;
use crate::utils::time::{local_instant, parse_optional_time};
use chrono::Duration;

/// Change the times of the session recorded on a date.
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    let Commands::Edit {
        date,
        start,
        end,
        clear_out,
    } = cmd
    else {
        return Ok(());
    };

    let d = date::parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    let start_t = parse_optional_time(start.as_ref())?;
    let end_t = parse_optional_time(end.as_ref())?;

    let Some(user) = report(ctx.require_user().cloned())? else {
        return Ok(());
    };

    let Some(session) = ctx.repo().session_by_date(&user.id, d)? else {
        warning(format!("No session recorded on {}", d));
        return Ok(());
    };

    let new_start = match start_t {
        Some(t) => Some(local_instant(d, t)?),
        None => session.start_at,
    };

    let new_end = if *clear_out {
        None
    } else {
        match end_t {
            Some(t) => {
                let mut e = local_instant(d, t)?;
                // an end before the start is taken as the next morning
                if let Some(s) = new_start
                    && e < s
                {
                    e += Duration::days(1);
                }
                Some(e)
            }
            None => session.end_at,
        }
    };

    if new_start == session.start_at && new_end == session.end_at {
        info(format!("Nothing to change for {}", d));
        return Ok(());
    }

    let outcome = ClockLogic::edit_times(ctx, &session, new_start, new_end);
    if let Some(updated) = report(outcome)? {
        success(format!(
            "Updated {}: {} - {} ({})",
            updated.work_date_str(),
            format_time(updated.start_at),
            format_time(updated.end_at),
            updated.state.to_db_str()
        ));
    }

    Ok(())
}

