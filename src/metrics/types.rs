use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{DetectionState, EvidenceLevel};

/// Fraction of identified PGx variants that matched a known variant.
///
/// Undefined (not zero) when detection found nothing to match against;
/// serialized as the literal string `"N/A"` in that case, a number
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completeness {
    NotApplicable,
    Fraction(f64),
}

impl Completeness {
    pub fn as_fraction(&self) -> Option<f64> {
        match self {
            Self::Fraction(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl Serialize for Completeness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotApplicable => serializer.serialize_str("N/A"),
            Self::Fraction(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Completeness {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CompletenessVisitor;

        impl Visitor<'_> for CompletenessVisitor {
            type Value = Completeness;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number or the string \"N/A\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Completeness::Fraction(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Completeness::Fraction(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Completeness::Fraction(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == "N/A" {
                    Ok(Completeness::NotApplicable)
                } else {
                    Err(E::custom(format!("unexpected completeness string: {v}")))
                }
            }
        }

        deserializer.deserialize_any(CompletenessVisitor)
    }
}

/// Histogram of matched variants over evidence levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDistribution {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
    pub unknown: u64,
}

impl EvidenceDistribution {
    pub fn record(&mut self, level: Option<EvidenceLevel>) {
        match level {
            Some(EvidenceLevel::A) => self.a += 1,
            Some(EvidenceLevel::B) => self.b += 1,
            Some(EvidenceLevel::C) => self.c += 1,
            Some(EvidenceLevel::D) => self.d += 1,
            None => self.unknown += 1,
        }
    }

    /// Must equal the matched-variant count; re-checked by
    /// [`validate_metrics`](super::validate_metrics).
    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d + self.unknown
    }
}

/// Derived, immutable snapshot of how much of the variant evidence was
/// actually used. Created once per analysis and never mutated; consumers
/// that find an invariant violated log it and continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub total_variants: i64,
    pub pgx_variants_identified: i64,
    pub pgx_variants_matched: i64,
    pub pgx_variants_unmatched: i64,
    /// Mirrors `pgx_variants_matched`; kept as a separate field because the
    /// report schema exposes both and validation checks their agreement.
    pub variants_detected: i64,
    pub match_completeness: Completeness,
    pub average_quality_score: f64,
    pub evidence_distribution: EvidenceDistribution,
    pub variants_by_gene: BTreeMap<String, u64>,
    pub variants_by_drug: BTreeMap<String, u64>,
    pub detection_state: DetectionState,
    pub computed_at: DateTime<Utc>,
}

/// Outcome of the independent invariant re-check. Purely observational:
/// a failing validation never rejects the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_serializes_sentinel() {
        let json = serde_json::to_string(&Completeness::NotApplicable).unwrap();
        assert_eq!(json, "\"N/A\"");
    }

    #[test]
    fn completeness_serializes_fraction() {
        let json = serde_json::to_string(&Completeness::Fraction(0.75)).unwrap();
        assert_eq!(json, "0.75");
    }

    #[test]
    fn completeness_round_trips_both_forms() {
        let na: Completeness = serde_json::from_str("\"N/A\"").unwrap();
        assert!(na.is_not_applicable());

        let frac: Completeness = serde_json::from_str("0.5").unwrap();
        assert_eq!(frac.as_fraction(), Some(0.5));
    }

    #[test]
    fn completeness_rejects_other_strings() {
        let result: Result<Completeness, _> = serde_json::from_str("\"none\"");
        assert!(result.is_err());
    }

    #[test]
    fn distribution_records_all_buckets() {
        let mut dist = EvidenceDistribution::default();
        dist.record(Some(EvidenceLevel::A));
        dist.record(Some(EvidenceLevel::B));
        dist.record(Some(EvidenceLevel::C));
        dist.record(Some(EvidenceLevel::D));
        dist.record(None);
        dist.record(None);
        assert_eq!(dist.a, 1);
        assert_eq!(dist.unknown, 2);
        assert_eq!(dist.total(), 6);
    }
}
