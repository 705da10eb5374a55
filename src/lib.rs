//! `premium-predictor` library crate.
//!
//! The binary (`premium`) is a thin wrapper around this library so that:
//!
//! - the submission pipeline is testable without spawning processes
//! - the CLI, batch and TUI front-ends share one implementation
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod telemetry;
pub mod tui;
