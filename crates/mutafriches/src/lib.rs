pub mod config;
pub mod error;
pub mod friches;
pub mod telemetry;
