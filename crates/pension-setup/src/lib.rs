//! Pension account opening workflow with its configuration, telemetry, and
//! HTTP surface.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
