//! Contradiction Detector: sanity-checks free-text explanations against
//! the structured variant evidence that was supposed to motivate them.
//!
//! Intentionally a conservative, high-precision rule engine, not a
//! semantic classifier. Ambiguous or unmatched claims are silently
//! ignored: a false positive would erode trust in a clinical-adjacent
//! explanation faster than a false negative.

pub mod claims;
pub mod consistency;
mod sentence;
pub mod types;

pub use claims::extract_biological_claims;
pub use consistency::{
    check_enzyme_activity_consistency, check_internal_consistency, detect_contradictions,
};
pub use types::*;
