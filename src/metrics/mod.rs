//! Metrics Engine: turns raw detection counts into a validated,
//! explainable statistics object.
//!
//! Availability over strictness: a patient report must always be produced,
//! so nothing here returns `Result`. Every degraded path yields a
//! documented safe default (`0`, `N/A`, empty histogram) and a log line
//! for later audit.

pub mod engine;
pub mod types;
pub mod validation;

pub use engine::*;
pub use types::*;
pub use validation::*;
