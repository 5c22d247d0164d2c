// Independent invariant re-check for QualityMetrics, applied after
// calculation. Feeds monitoring only: a failing validation never rejects
// the analysis.

use super::types::{Completeness, MetricsValidation, QualityMetrics};

/// Tolerance for the algebraic completeness re-check.
const COMPLETENESS_TOLERANCE: f64 = 0.001;

/// Re-check the seven metrics invariants independently of calculation.
///
/// Pure and idempotent; one human-readable error string per failing
/// invariant, never an early return.
pub fn validate_metrics(metrics: &QualityMetrics) -> MetricsValidation {
    let mut errors = Vec::new();

    // 1. Count consistency
    if metrics.pgx_variants_matched + metrics.pgx_variants_unmatched
        != metrics.pgx_variants_identified
    {
        errors.push(format!(
            "matched + unmatched != identified ({} + {} != {})",
            metrics.pgx_variants_matched,
            metrics.pgx_variants_unmatched,
            metrics.pgx_variants_identified
        ));
    }

    // 2. PGx subset of total
    if metrics.pgx_variants_identified > metrics.total_variants {
        errors.push(format!(
            "PGx variants identified ({}) exceeds total variants ({})",
            metrics.pgx_variants_identified, metrics.total_variants
        ));
    }

    // 3. Non-negativity
    for (name, value) in [
        ("total_variants", metrics.total_variants),
        ("pgx_variants_identified", metrics.pgx_variants_identified),
        ("pgx_variants_matched", metrics.pgx_variants_matched),
        ("pgx_variants_unmatched", metrics.pgx_variants_unmatched),
        ("variants_detected", metrics.variants_detected),
    ] {
        if value < 0 {
            errors.push(format!("{name} is negative ({value})"));
        }
    }

    // 4. Quality score bounds
    if !(0.0..=100.0).contains(&metrics.average_quality_score) {
        errors.push(format!(
            "average quality score {} outside [0, 100]",
            metrics.average_quality_score
        ));
    }

    // 5. Histogram sum
    if metrics.evidence_distribution.total() as i64 != metrics.pgx_variants_matched {
        errors.push(format!(
            "evidence histogram sum ({}) != matched count ({})",
            metrics.evidence_distribution.total(),
            metrics.pgx_variants_matched
        ));
    }

    // 6. Algebraic completeness, when numeric
    if let Completeness::Fraction(actual) = metrics.match_completeness {
        let expected = if metrics.pgx_variants_identified > 0 {
            metrics.pgx_variants_matched as f64 / metrics.pgx_variants_identified as f64
        } else {
            0.0
        };
        if (actual - expected).abs() > COMPLETENESS_TOLERANCE {
            errors.push(format!(
                "completeness {actual} disagrees with matched/identified ({expected})"
            ));
        }
    }

    // 7. Detected mirrors matched
    if metrics.variants_detected != metrics.pgx_variants_matched {
        errors.push(format!(
            "variants_detected ({}) != pgx_variants_matched ({})",
            metrics.variants_detected, metrics.pgx_variants_matched
        ));
    }

    MetricsValidation {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::EvidenceDistribution;
    use crate::models::DetectionState;
    use chrono::Utc;

    fn valid_metrics() -> QualityMetrics {
        QualityMetrics {
            total_variants: 1000,
            pgx_variants_identified: 4,
            pgx_variants_matched: 3,
            pgx_variants_unmatched: 1,
            variants_detected: 3,
            match_completeness: Completeness::Fraction(0.75),
            average_quality_score: 92.5,
            evidence_distribution: EvidenceDistribution {
                a: 2,
                b: 0,
                c: 0,
                d: 0,
                unknown: 1,
            },
            variants_by_gene: Default::default(),
            variants_by_drug: Default::default(),
            detection_state: DetectionState::PgxVariantsFoundSomeMatched,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn valid_metrics_pass_all_invariants() {
        let result = validate_metrics(&valid_metrics());
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn count_inconsistency_is_reported() {
        let mut metrics = valid_metrics();
        metrics.pgx_variants_unmatched = 5;
        let result = validate_metrics(&metrics);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("matched + unmatched")));
    }

    #[test]
    fn pgx_exceeding_total_is_reported() {
        let mut metrics = valid_metrics();
        metrics.total_variants = 2;
        let result = validate_metrics(&metrics);
        assert!(result.errors.iter().any(|e| e.contains("exceeds total")));
    }

    #[test]
    fn negative_counts_are_reported_individually() {
        let mut metrics = valid_metrics();
        metrics.pgx_variants_unmatched = -1;
        metrics.total_variants = -5;
        let result = validate_metrics(&metrics);
        let negative_errors = result
            .errors
            .iter()
            .filter(|e| e.contains("negative"))
            .count();
        assert_eq!(negative_errors, 2);
    }

    #[test]
    fn quality_score_out_of_range_is_reported() {
        let mut metrics = valid_metrics();
        metrics.average_quality_score = 104.2;
        let result = validate_metrics(&metrics);
        assert!(result.errors.iter().any(|e| e.contains("quality score")));
    }

    #[test]
    fn histogram_mismatch_is_reported() {
        let mut metrics = valid_metrics();
        metrics.evidence_distribution.unknown = 9;
        let result = validate_metrics(&metrics);
        assert!(result.errors.iter().any(|e| e.contains("histogram")));
    }

    #[test]
    fn completeness_formula_is_rechecked() {
        let mut metrics = valid_metrics();
        metrics.match_completeness = Completeness::Fraction(0.9);
        let result = validate_metrics(&metrics);
        assert!(result.errors.iter().any(|e| e.contains("completeness")));
    }

    #[test]
    fn not_applicable_completeness_skips_formula_check() {
        let mut metrics = valid_metrics();
        metrics.match_completeness = Completeness::NotApplicable;
        let result = validate_metrics(&metrics);
        assert!(!result.errors.iter().any(|e| e.contains("completeness")));
    }

    #[test]
    fn detected_matched_disagreement_is_reported() {
        let mut metrics = valid_metrics();
        metrics.variants_detected = 7;
        let result = validate_metrics(&metrics);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("variants_detected")));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut metrics = valid_metrics();
        metrics.pgx_variants_unmatched = 9;
        metrics.average_quality_score = -3.0;
        let first = validate_metrics(&metrics);
        let second = validate_metrics(&metrics);
        assert_eq!(first, second);
    }
}
