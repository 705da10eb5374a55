//! Input/output helpers.
//!
//! - applicants CSV ingest + validation (`ingest`)
//! - results CSV and PDF report writes (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
