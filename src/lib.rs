//! Quality-assurance core for pharmacogenomic (PGx) clinical reports.
//!
//! Three coupled components sit between variant detection and report
//! assembly:
//!
//! - [`metrics`] — derives and cross-validates completeness/quality
//!   statistics from variant-matching results. Never fails: every degraded
//!   path yields a documented safe default and a log line.
//! - [`contradiction`] — extracts biological assertions from generated
//!   free text and checks them against the structured variant evidence.
//!   Conservative by design: ambiguous claims are ignored, not flagged.
//! - [`generation`] — drives the external text-generation call with bounded
//!   retry/backoff and a deterministic fallback, so a patient report is
//!   always produced even when the provider is down.
//!
//! Upstream parsing (VCF, variant matching, phenotype inference) and the
//! surrounding HTTP/persistence layers are external; this crate consumes
//! and produces their value objects only.

pub mod config;
pub mod contradiction;
pub mod generation;
pub mod metrics;
pub mod models;

pub use config::{ConfigError, GenerationConfig};
pub use contradiction::detect_contradictions;
pub use generation::ExplanationGenerator;
pub use metrics::{calculate_metrics, validate_metrics};
