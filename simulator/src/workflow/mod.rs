pub mod config;
pub mod realtime;
pub mod report;
pub mod runner;
