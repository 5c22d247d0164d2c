use serde::{Deserialize, Serialize};

/// CPIC-style clinical evidence grade for a variant-drug association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceLevel {
    A,
    B,
    C,
    D,
}

/// Functional classification of a pharmacogene variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalStatus {
    Normal,
    Decreased,
    Increased,
    NoFunction,
}

impl FunctionalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Decreased => "decreased",
            Self::Increased => "increased",
            Self::NoFunction => "no_function",
        }
    }
}

/// A genomic variant as produced by the upstream detection subsystem.
///
/// Immutable once produced; shared read-only between the metrics and
/// contradiction passes of a single analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRecord {
    pub chromosome: String,
    pub position: u64,
    /// Reference SNP identifier (e.g. `rs4244285`).
    pub rsid: Option<String>,
    /// Star-allele label (e.g. `*4`).
    pub star_allele: Option<String>,
    pub gene: Option<String>,
    pub evidence_level: Option<EvidenceLevel>,
    pub functional_status: Option<FunctionalStatus>,
    pub quality_score: f64,
}

impl VariantRecord {
    /// Preferred display identifier: rsID, else star allele, else position.
    pub fn identifier(&self) -> String {
        if let Some(rsid) = &self.rsid {
            rsid.clone()
        } else if let Some(star) = &self.star_allele {
            star.clone()
        } else {
            format!("{}:{}", self.chromosome, self.position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant() -> VariantRecord {
        VariantRecord {
            chromosome: "chr22".into(),
            position: 42_126_611,
            rsid: Some("rs3892097".into()),
            star_allele: Some("*4".into()),
            gene: Some("CYP2D6".into()),
            evidence_level: Some(EvidenceLevel::A),
            functional_status: Some(FunctionalStatus::NoFunction),
            quality_score: 98.0,
        }
    }

    #[test]
    fn identifier_prefers_rsid() {
        assert_eq!(variant().identifier(), "rs3892097");
    }

    #[test]
    fn identifier_falls_back_to_star_allele() {
        let mut v = variant();
        v.rsid = None;
        assert_eq!(v.identifier(), "*4");
    }

    #[test]
    fn identifier_falls_back_to_position() {
        let mut v = variant();
        v.rsid = None;
        v.star_allele = None;
        assert_eq!(v.identifier(), "chr22:42126611");
    }

    #[test]
    fn functional_status_serializes_snake_case() {
        let json = serde_json::to_string(&FunctionalStatus::NoFunction).unwrap();
        assert_eq!(json, "\"no_function\"");
    }
}
