use crate::core::calculator::summarize_month;
use crate::core::context::AppContext;
use crate::errors::LifecycleResult;
use crate::models::month_summary::MonthSummary;

pub struct ReportLogic;

impl ReportLogic {
    /// Sessions of `year`/`month` for the current user, ordered by work
    /// date, with overtime and undertime totals.
    pub fn month(ctx: &AppContext, year: i32, month: u32) -> LifecycleResult<MonthSummary> {
        let user = ctx.require_user()?;
        let sessions = ctx.repo().sessions_in_month(&user.id, year, month)?;
        Ok(summarize_month(year, month, sessions))
    }
}
