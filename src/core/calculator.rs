//! Work time arithmetic: fixed 8h requirement, fixed 1h break.

use crate::models::month_summary::{MonthRow, MonthSummary};
use crate::models::session::Session;
use crate::models::work_summary::WorkAndDiff;

/// Expected work per day.
pub const REQUIRED_MINUTES: i64 = 480;
/// Break deducted from every closed session.
pub const BREAK_MINUTES: i64 = 60;

/// Work and diff minutes of a session.
///
/// Gross minutes are floored; the break is deducted and the result clamped
/// at zero, so an end before the start yields 0 work minutes, never a
/// negative amount.
pub fn calc_work_and_diff(session: &Session) -> WorkAndDiff {
    let (Some(start), Some(end)) = (session.start_at, session.end_at) else {
        return WorkAndDiff::default();
    };

    let gross = (end - start).num_milliseconds().div_euclid(60_000);
    let work = (gross - BREAK_MINUTES).max(0);

    WorkAndDiff {
        work_minutes: Some(work),
        diff_minutes: Some(work - REQUIRED_MINUTES),
    }
}

/// (overtime, undertime) totals over diffs; zero and undefined diffs
/// count for neither.
pub fn overtime_undertime<I>(diffs: I) -> (i64, i64)
where
    I: IntoIterator<Item = Option<i64>>,
{
    diffs
        .into_iter()
        .flatten()
        .fold((0, 0), |(over, under), d| {
            if d > 0 {
                (over + d, under)
            } else {
                (over, under - d)
            }
        })
}

/// Monthly view: rows ordered by work date plus totals.
pub fn summarize_month(year: i32, month: u32, mut sessions: Vec<Session>) -> MonthSummary {
    sessions.sort_by(|a, b| a.work_date.cmp(&b.work_date));

    let rows: Vec<MonthRow> = sessions
        .into_iter()
        .map(|session| {
            let work = calc_work_and_diff(&session);
            MonthRow { session, work }
        })
        .collect();

    let (overtime_minutes, undertime_minutes) =
        overtime_undertime(rows.iter().map(|r| r.work.diff_minutes));

    MonthSummary {
        year,
        month,
        rows,
        overtime_minutes,
        undertime_minutes,
    }
}
