//! Presentation and report export.
//!
//! - result formatting shared by the CLI and TUI (`format`)
//! - report layout (`document`)
//! - PDF rendering (`pdf`)

pub mod document;
pub mod format;
pub mod pdf;

pub use document::*;
pub use format::*;
pub use pdf::*;
