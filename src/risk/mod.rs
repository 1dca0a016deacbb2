//! Risk scoring
//!
//! The formula-based scorer behind the public prediction endpoints. A
//! deterministic weighted score over a handful of channels, bucketed into
//! four ordered categories, plus small random jitter for realism. The
//! trained-model path in `crate::model` implements the same contract and is
//! only used when an artifact is explicitly loaded.

mod scorer;
mod types;

pub use scorer::{assess, categorize, composite_score, fallback_assessment};
pub use types::{CategoryBreakdown, RiskAssessment, RiskCategory};
