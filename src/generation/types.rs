use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::GenerationError;
use crate::models::VariantRecord;

/// Object-safe provider interface so test doubles and real clients can
/// coexist behind one orchestrator.
pub trait LlmClient: Send + Sync {
    fn generate(&self, model: &str, prompt: &str, system: &str)
        -> Result<String, GenerationError>;

    fn is_model_available(&self, model: &str) -> Result<bool, GenerationError>;

    fn list_models(&self) -> Result<Vec<String>, GenerationError>;
}

/// Metabolizer phenotype inferred upstream from the diplotype.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phenotype {
    PoorMetabolizer,
    IntermediateMetabolizer,
    NormalMetabolizer,
    RapidMetabolizer,
    UltrarapidMetabolizer,
}

impl Phenotype {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PoorMetabolizer => "Poor Metabolizer",
            Self::IntermediateMetabolizer => "Intermediate Metabolizer",
            Self::NormalMetabolizer => "Normal Metabolizer",
            Self::RapidMetabolizer => "Rapid Metabolizer",
            Self::UltrarapidMetabolizer => "Ultrarapid Metabolizer",
        }
    }

    pub fn is_reduced_function(&self) -> bool {
        matches!(self, Self::PoorMetabolizer | Self::IntermediateMetabolizer)
    }

    pub fn is_increased_function(&self) -> bool {
        matches!(self, Self::RapidMetabolizer | Self::UltrarapidMetabolizer)
    }
}

/// Structured context for one drug's explanation: everything the prompt
/// and the deterministic fallback are built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub drug: String,
    pub gene: String,
    pub diplotype: String,
    pub phenotype: Phenotype,
    /// CPIC-style recommendation text from the external rule layer.
    pub recommendation: String,
    pub variants: Vec<VariantRecord>,
}

/// The four narrative sections of a clinical explanation. Immutable once
/// returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub biological_mechanism: String,
    pub variant_interpretation: String,
    pub clinical_impact: String,
}

/// An explanation plus orchestrator metadata for logging/telemetry. The
/// metadata is not part of the persisted report schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub explanation: Explanation,
    pub succeeded: bool,
    pub used_fallback: bool,
    pub attempts: usize,
}

/// Cooperative cancellation handle at whole-analysis granularity.
///
/// Clones share the flag; cancelling abandons in-flight retries for this
/// analysis without affecting unrelated requests.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
