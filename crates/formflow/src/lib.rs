//! Multi-step form wizard: per-step field selection, validation and the
//! confirm-stage aggregation of everything the user entered.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
pub mod wizard;
