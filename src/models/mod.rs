pub mod month_summary;
pub mod session;
pub mod session_state;
pub mod user;
pub mod work_summary;
