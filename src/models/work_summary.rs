use serde::Serialize;

/// Work and diff minutes of one session.
/// Both are `None` while the session is open or a timestamp is missing.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WorkAndDiff {
    pub work_minutes: Option<i64>,
    pub diff_minutes: Option<i64>,
}
