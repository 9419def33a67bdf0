use super::{session::Session, work_summary::WorkAndDiff};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MonthRow {
    pub session: Session,
    pub work: WorkAndDiff,
}

/// Sessions of one month with overtime / undertime totals (minutes).
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<MonthRow>,
    pub overtime_minutes: i64,
    pub undertime_minutes: i64,
}
