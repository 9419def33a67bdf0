use crate::cli::parser::Commands;
use crate::cli::commands::report;
use crate::core::context::AppContext;
use crate::core::lifecycle::ClockLogic;
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::ui::messages::success;
use crate::utils::formatting::format_time;

/// Handle `in`, `out` and `toggle`.
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    let outcome = match cmd {
        Commands::In => ClockLogic::clock_in(ctx),
        Commands::Out => ClockLogic::clock_out(ctx),
        Commands::Toggle => ClockLogic::toggle(ctx),
        _ => return Ok(()),
    };

    if let Some(session) = report(outcome)? {
        print_result(&session);
    }
    Ok(())
}

fn print_result(session: &Session) {
    if session.is_working() {
        success(format!(
            "Clocked in at {} ({})",
            format_time(session.start_at),
            session.work_date_str()
        ));
    } else {
        success(format!(
            "Clocked out at {} ({})",
            format_time(session.end_at),
            session.work_date_str()
        ));
    }
}
