pub mod controls;
pub mod report;
