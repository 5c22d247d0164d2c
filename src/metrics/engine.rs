use std::collections::BTreeMap;

use chrono::Utc;

use super::types::{Completeness, EvidenceDistribution, QualityMetrics};
use crate::models::{DetectionResult, DetectionState, GeneDrugMap, VariantRecord};

/// Quality scores live on a 0–100 scale; anything outside is clamped, not
/// propagated.
const QUALITY_SCORE_MAX: f64 = 100.0;

/// Fraction of identified PGx variants that matched.
///
/// `NotApplicable` when detection found nothing to match against; `0` when
/// nothing was identified under any other state.
pub fn completeness(identified: i64, matched: i64, state: DetectionState) -> Completeness {
    match state {
        DetectionState::NoVariantsInVcf | DetectionState::NoPgxVariantsDetected => {
            Completeness::NotApplicable
        }
        _ if identified <= 0 => Completeness::Fraction(0.0),
        _ => Completeness::Fraction(matched as f64 / identified as f64),
    }
}

/// Arithmetic mean of per-variant quality scores, clamped to `[0, 100]`.
/// Scores are assumed well-formed but defensively bounded.
pub fn average_quality(variants: &[VariantRecord]) -> f64 {
    if variants.is_empty() {
        return 0.0;
    }

    let mean = variants.iter().map(|v| v.quality_score).sum::<f64>() / variants.len() as f64;
    if mean.is_nan() {
        tracing::warn!("Average quality score is NaN, substituting 0");
        return 0.0;
    }
    if !(0.0..=QUALITY_SCORE_MAX).contains(&mean) {
        tracing::warn!(mean, "Average quality score out of [0, 100], clamping");
        return mean.clamp(0.0, QUALITY_SCORE_MAX);
    }
    mean
}

/// Histogram of matched variants over `{A, B, C, D, unknown}`. The sum
/// equals `matched.len()` by construction and is re-checked downstream.
pub fn evidence_distribution(matched: &[VariantRecord]) -> EvidenceDistribution {
    let mut dist = EvidenceDistribution::default();
    for variant in matched {
        dist.record(variant.evidence_level);
    }
    dist
}

/// Matched-variant tally per gene symbol; variants without a gene are
/// ignored.
pub fn variants_by_gene(matched: &[VariantRecord]) -> BTreeMap<String, u64> {
    let mut by_gene = BTreeMap::new();
    for variant in matched {
        if let Some(gene) = &variant.gene {
            *by_gene.entry(gene.clone()).or_insert(0) += 1;
        }
    }
    by_gene
}

/// Matched-variant tally per drug, via the externally supplied gene→drug
/// table. A variant in a gene tied to three drugs increments all three.
pub fn variants_by_drug(matched: &[VariantRecord], map: &GeneDrugMap) -> BTreeMap<String, u64> {
    let mut by_drug = BTreeMap::new();
    for variant in matched {
        let Some(gene) = &variant.gene else { continue };
        let Some(drugs) = map.get(gene) else { continue };
        for drug in drugs {
            *by_drug.entry(drug.clone()).or_insert(0) += 1;
        }
    }
    by_drug
}

/// Derive the full [`QualityMetrics`] snapshot for one analysis.
///
/// Counts come from the slice lengths. When `matched + unmatched !=
/// identified` the violation is logged with all operands plus a recomputed
/// safe unmatched value, but the returned metrics keep the original count
/// so downstream consumers see the raw data; `validate_metrics` flags the
/// inconsistency for monitoring.
pub fn calculate_metrics(
    all_variants: &[VariantRecord],
    pgx_variants: &[VariantRecord],
    matched: &[VariantRecord],
    unmatched: &[VariantRecord],
    state: DetectionState,
    map: &GeneDrugMap,
) -> QualityMetrics {
    let total = all_variants.len() as i64;
    let identified = pgx_variants.len() as i64;
    let matched_count = matched.len() as i64;
    let unmatched_count = unmatched.len() as i64;

    if matched_count + unmatched_count != identified {
        let safe_unmatched = (identified - matched_count).max(0);
        tracing::warn!(
            identified,
            matched = matched_count,
            unmatched = unmatched_count,
            safe_unmatched,
            "Detection counts inconsistent: matched + unmatched != identified"
        );
    }

    let distribution = evidence_distribution(matched);
    if distribution.total() != matched.len() as u64 {
        tracing::warn!(
            histogram_total = distribution.total(),
            matched = matched.len(),
            "Evidence histogram sum does not equal matched count"
        );
    }

    QualityMetrics {
        total_variants: total,
        pgx_variants_identified: identified,
        pgx_variants_matched: matched_count,
        pgx_variants_unmatched: unmatched_count,
        variants_detected: matched_count,
        match_completeness: completeness(identified, matched_count, state),
        average_quality_score: average_quality(matched),
        evidence_distribution: distribution,
        variants_by_gene: variants_by_gene(matched),
        variants_by_drug: variants_by_drug(matched, map),
        detection_state: state,
        computed_at: Utc::now(),
    }
}

/// Convenience wrapper over [`calculate_metrics`] for the upstream
/// [`DetectionResult`] interface record.
pub fn calculate_from_detection(
    all_variants: &[VariantRecord],
    pgx_variants: &[VariantRecord],
    detection: &DetectionResult,
    map: &GeneDrugMap,
) -> QualityMetrics {
    calculate_metrics(
        all_variants,
        pgx_variants,
        &detection.matched,
        &detection.unmatched,
        detection.state,
        map,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::validate_metrics;
    use crate::models::{EvidenceLevel, FunctionalStatus};

    fn variant(gene: &str, rsid: &str, level: Option<EvidenceLevel>, quality: f64) -> VariantRecord {
        VariantRecord {
            chromosome: "chr10".into(),
            position: 94_781_859,
            rsid: Some(rsid.into()),
            star_allele: None,
            gene: Some(gene.into()),
            evidence_level: level,
            functional_status: Some(FunctionalStatus::Decreased),
            quality_score: quality,
        }
    }

    fn drug_map() -> GeneDrugMap {
        let mut map = GeneDrugMap::new();
        map.insert(
            "CYP2C19".into(),
            vec!["clopidogrel".into(), "voriconazole".into(), "citalopram".into()],
        );
        map.insert("CYP2D6".into(), vec!["codeine".into()]);
        map
    }

    #[test]
    fn completeness_undefined_when_nothing_to_match() {
        assert!(completeness(0, 0, DetectionState::NoVariantsInVcf).is_not_applicable());
        assert!(completeness(0, 0, DetectionState::NoPgxVariantsDetected).is_not_applicable());
    }

    #[test]
    fn completeness_zero_when_none_identified_elsewhere() {
        let c = completeness(0, 0, DetectionState::PgxVariantsFoundNoneMatched);
        assert_eq!(c.as_fraction(), Some(0.0));
    }

    #[test]
    fn completeness_is_matched_over_identified() {
        let c = completeness(4, 3, DetectionState::PgxVariantsFoundSomeMatched);
        let f = c.as_fraction().unwrap();
        assert!((f - 0.75).abs() < 0.001, "expected 0.75, got {f}");
    }

    #[test]
    fn average_quality_empty_is_zero() {
        assert_eq!(average_quality(&[]), 0.0);
    }

    #[test]
    fn average_quality_is_arithmetic_mean() {
        let variants = vec![
            variant("CYP2D6", "rs1", None, 90.0),
            variant("CYP2D6", "rs2", None, 70.0),
        ];
        assert!((average_quality(&variants) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_quality_clamps_out_of_range() {
        let variants = vec![
            variant("CYP2D6", "rs1", None, 250.0),
            variant("CYP2D6", "rs2", None, 150.0),
        ];
        assert_eq!(average_quality(&variants), 100.0);

        let negative = vec![variant("CYP2D6", "rs3", None, -20.0)];
        assert_eq!(average_quality(&negative), 0.0);
    }

    #[test]
    fn histogram_sums_to_matched_count() {
        let matched = vec![
            variant("CYP2C19", "rs1", Some(EvidenceLevel::A), 99.0),
            variant("CYP2C19", "rs2", Some(EvidenceLevel::A), 98.0),
            variant("CYP2C19", "rs3", Some(EvidenceLevel::C), 80.0),
            variant("CYP2C19", "rs4", None, 60.0),
        ];
        let dist = evidence_distribution(&matched);
        assert_eq!(dist.a, 2);
        assert_eq!(dist.c, 1);
        assert_eq!(dist.unknown, 1);
        assert_eq!(dist.total(), matched.len() as u64);
    }

    #[test]
    fn gene_tally_ignores_variants_without_gene() {
        let mut orphan = variant("CYP2D6", "rs9", None, 50.0);
        orphan.gene = None;
        let matched = vec![
            variant("CYP2D6", "rs1", None, 90.0),
            variant("CYP2D6", "rs2", None, 90.0),
            orphan,
        ];
        let by_gene = variants_by_gene(&matched);
        assert_eq!(by_gene.get("CYP2D6"), Some(&2));
        assert_eq!(by_gene.len(), 1);
    }

    #[test]
    fn drug_tally_increments_every_affected_drug() {
        let matched = vec![variant("CYP2C19", "rs4244285", Some(EvidenceLevel::A), 99.0)];
        let by_drug = variants_by_drug(&matched, &drug_map());
        assert_eq!(by_drug.get("clopidogrel"), Some(&1));
        assert_eq!(by_drug.get("voriconazole"), Some(&1));
        assert_eq!(by_drug.get("citalopram"), Some(&1));
    }

    #[test]
    fn drug_tally_skips_unmapped_genes() {
        let matched = vec![variant("VKORC1", "rs9923231", Some(EvidenceLevel::A), 99.0)];
        let by_drug = variants_by_drug(&matched, &drug_map());
        assert!(by_drug.is_empty());
    }

    #[test]
    fn consistent_inputs_produce_valid_metrics() {
        let pgx = vec![
            variant("CYP2C19", "rs1", Some(EvidenceLevel::A), 95.0),
            variant("CYP2C19", "rs2", Some(EvidenceLevel::B), 85.0),
            variant("CYP2D6", "rs3", None, 75.0),
        ];
        let matched = pgx[..2].to_vec();
        let unmatched = pgx[2..].to_vec();

        let metrics = calculate_metrics(
            &pgx,
            &pgx,
            &matched,
            &unmatched,
            DetectionState::PgxVariantsFoundSomeMatched,
            &drug_map(),
        );

        assert_eq!(metrics.pgx_variants_identified, 3);
        assert_eq!(metrics.pgx_variants_matched, 2);
        assert_eq!(metrics.pgx_variants_unmatched, 1);
        assert_eq!(metrics.variants_detected, 2);

        let validation = validate_metrics(&metrics);
        assert!(validation.valid, "unexpected errors: {:?}", validation.errors);
    }

    #[test]
    fn inconsistent_counts_are_returned_raw_and_flagged() {
        let pgx = vec![
            variant("CYP2C19", "rs1", Some(EvidenceLevel::A), 95.0),
            variant("CYP2C19", "rs2", Some(EvidenceLevel::B), 85.0),
            variant("CYP2D6", "rs3", None, 75.0),
            variant("CYP2D6", "rs4", None, 70.0),
            variant("CYP2D6", "rs5", None, 65.0),
        ];
        let matched = pgx[..2].to_vec();
        // Upstream bug fixture: one unmatched variant lost somewhere.
        let unmatched = pgx[2..4].to_vec();

        let metrics = calculate_metrics(
            &pgx,
            &pgx,
            &matched,
            &unmatched,
            DetectionState::PgxVariantsFoundSomeMatched,
            &drug_map(),
        );

        // Original (inconsistent) unmatched count is preserved.
        assert_eq!(metrics.pgx_variants_unmatched, 2);
        assert_eq!(metrics.pgx_variants_identified, 5);

        let validation = validate_metrics(&metrics);
        assert!(!validation.valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("matched + unmatched")));
    }

    #[test]
    fn detection_result_wrapper_uses_its_lists_and_state() {
        let matched = vec![variant("CYP2D6", "rs1", Some(EvidenceLevel::A), 95.0)];
        let detection = DetectionResult {
            matched: matched.clone(),
            unmatched: vec![],
            total_vcf_variants: 1200,
            pgx_variants_found: 1,
            matched_count: 1,
            state: DetectionState::PgxVariantsFoundAllMatched,
        };

        let metrics = calculate_from_detection(&matched, &matched, &detection, &drug_map());
        assert_eq!(metrics.detection_state, DetectionState::PgxVariantsFoundAllMatched);
        assert_eq!(metrics.match_completeness.as_fraction(), Some(1.0));
    }
}
