pub mod calculator;
pub mod context;
pub mod lifecycle;
pub mod log;
pub mod report;
