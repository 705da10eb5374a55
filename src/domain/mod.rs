//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - applicant inputs and validation (`ApplicantRecord`, `ApplicantForm`)
//! - the model output (`PremiumEstimate`)
//! - tier classification and per-tier display styles (`RiskTier`, `TierStyle`)

pub mod tier;
pub mod types;

pub use tier::*;
pub use types::*;
