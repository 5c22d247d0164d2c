use uuid::Uuid;

use super::fallback::{build_fallback_explanation, PhenotypeGlossary};
use super::parser::parse_explanation;
use super::prompt::{build_explanation_prompt, EXPLANATION_SYSTEM_PROMPT};
use super::types::{CancelToken, ExplanationRequest, GenerationResult, LlmClient};
use crate::config::GenerationConfig;
use crate::contradiction::{detect_contradictions, Severity};

/// Drives the external generation call for one analysis: bounded retry
/// with exponential backoff, optional contradiction self-check, and a
/// deterministic fallback when generation is unusable.
///
/// Constructed once per process with an explicit configuration; multiple
/// instances (e.g. test doubles) can coexist.
pub struct ExplanationGenerator {
    llm: Box<dyn LlmClient>,
    config: GenerationConfig,
    glossary: PhenotypeGlossary,
}

impl ExplanationGenerator {
    pub fn new(llm: Box<dyn LlmClient>, config: GenerationConfig) -> Self {
        Self {
            llm,
            config,
            glossary: PhenotypeGlossary::default(),
        }
    }

    pub fn with_glossary(mut self, glossary: PhenotypeGlossary) -> Self {
        self.glossary = glossary;
        self
    }

    /// Generate one drug's explanation. Never fails: after the retry
    /// budget is exhausted the deterministic fallback is returned, tagged
    /// so callers can report degraded quality without failing the
    /// analysis.
    pub fn generate(&self, analysis_id: &Uuid, request: &ExplanationRequest) -> GenerationResult {
        self.generate_with_cancel(analysis_id, request, &CancelToken::new())
    }

    /// As [`generate`](Self::generate), abandoning retries when the
    /// analysis-level token is cancelled.
    pub fn generate_with_cancel(
        &self,
        analysis_id: &Uuid,
        request: &ExplanationRequest,
        cancel: &CancelToken,
    ) -> GenerationResult {
        let _span = tracing::info_span!(
            "generate_explanation",
            analysis_id = %analysis_id,
            drug = %request.drug,
            gene = %request.gene
        )
        .entered();

        let prompt = build_explanation_prompt(request);
        let mut attempts = 0;

        for attempt in 1..=self.config.max_retries {
            if cancel.is_cancelled() {
                tracing::info!(attempt, "Generation cancelled, abandoning retries");
                break;
            }
            attempts = attempt;

            match self
                .llm
                .generate(&self.config.model, &prompt, EXPLANATION_SYSTEM_PROMPT)
            {
                Ok(text) if !text.trim().is_empty() => {
                    if self.config.self_check && self.text_contradicts_evidence(&text, request) {
                        tracing::warn!(
                            attempt,
                            "Generated text contradicts variant evidence, treating as failed"
                        );
                    } else {
                        return GenerationResult {
                            explanation: parse_explanation(&text),
                            succeeded: true,
                            used_fallback: false,
                            attempts,
                        };
                    }
                }
                Ok(_) => {
                    tracing::warn!(attempt, "Provider returned empty text");
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Generation call failed");
                }
            }

            if attempt < self.config.max_retries && !cancel.is_cancelled() {
                let delay = self.config.base_delay * 2u32.pow(attempt as u32 - 1);
                std::thread::sleep(delay);
            }
        }

        tracing::info!(attempts, "Generation unusable, using deterministic fallback");
        GenerationResult {
            explanation: build_fallback_explanation(request, &self.glossary),
            succeeded: false,
            used_fallback: true,
            attempts,
        }
    }

    /// Multi-drug fan-out: one independent invocation per request, results
    /// collected in input order. A failure, fallback, or panic on one item
    /// never affects its siblings.
    pub fn generate_batch(
        &self,
        analysis_id: &Uuid,
        requests: &[ExplanationRequest],
        cancel: &CancelToken,
    ) -> Vec<GenerationResult> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .map(|request| {
                    scope.spawn(move || self.generate_with_cancel(analysis_id, request, cancel))
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| match handle.join() {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!(
                            analysis_id = %analysis_id,
                            index,
                            "Generation worker panicked, substituting fallback"
                        );
                        GenerationResult {
                            explanation: build_fallback_explanation(
                                &requests[index],
                                &self.glossary,
                            ),
                            succeeded: false,
                            used_fallback: true,
                            attempts: 0,
                        }
                    }
                })
                .collect()
        })
    }

    /// High-severity contradictions make a response unusable; medium
    /// findings are logged for audit but accepted.
    fn text_contradicts_evidence(&self, text: &str, request: &ExplanationRequest) -> bool {
        let report = detect_contradictions(text, &request.variants);
        let high = report
            .contradictions
            .iter()
            .filter(|c| c.severity == Severity::High)
            .count();
        if high == 0 && !report.contradictions.is_empty() {
            tracing::info!(
                findings = report.contradictions.len(),
                "Medium-severity contradiction findings logged, response accepted"
            );
        }
        high > 0
    }
}
