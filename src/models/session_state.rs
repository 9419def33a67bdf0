use serde::{Deserialize, Serialize};

/// Status of a session: open (`WORKING`) or closed (`DONE`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Working,
    Done,
}

impl SessionState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionState::Working => "WORKING",
            SessionState::Done => "DONE",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "WORKING" => Some(SessionState::Working),
            "DONE" => Some(SessionState::Done),
            _ => None,
        }
    }

    /// State implied by the end timestamp.
    pub fn for_end<T>(end: Option<&T>) -> Self {
        if end.is_some() {
            SessionState::Done
        } else {
            SessionState::Working
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, SessionState::Working)
    }
}
