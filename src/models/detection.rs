use serde::{Deserialize, Serialize};

use super::variant::VariantRecord;

/// How variant detection proceeded for one uploaded file.
///
/// The first two states mean there was nothing to match against, so match
/// completeness is undefined (not zero) under them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionState {
    NoVariantsInVcf,
    NoPgxVariantsDetected,
    PgxVariantsFoundNoneMatched,
    PgxVariantsFoundSomeMatched,
    PgxVariantsFoundAllMatched,
}

/// Output of the external variant-detection subsystem.
///
/// Counts are signed because they arrive from a loosely-typed upstream and
/// may be inconsistent with the variant lists; the metrics validation pass
/// checks them rather than trusting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub matched: Vec<VariantRecord>,
    pub unmatched: Vec<VariantRecord>,
    pub total_vcf_variants: i64,
    pub pgx_variants_found: i64,
    pub matched_count: i64,
    pub state: DetectionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_state_serializes_snake_case() {
        let json = serde_json::to_string(&DetectionState::PgxVariantsFoundSomeMatched).unwrap();
        assert_eq!(json, "\"pgx_variants_found_some_matched\"");
    }

    #[test]
    fn detection_state_round_trips() {
        for state in [
            DetectionState::NoVariantsInVcf,
            DetectionState::NoPgxVariantsDetected,
            DetectionState::PgxVariantsFoundNoneMatched,
            DetectionState::PgxVariantsFoundSomeMatched,
            DetectionState::PgxVariantsFoundAllMatched,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            let back: DetectionState = serde_json::from_str(&json).unwrap();
            assert_eq!(back, state);
        }
    }
}
