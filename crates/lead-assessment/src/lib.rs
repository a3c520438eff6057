//! Child math assessment: question bank, answer feedback, reports and lead intake.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
