use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::types::{Explanation, ExplanationRequest, Phenotype};

/// Phenotype → plain-language description table for fallback prose.
/// Carries sensible defaults; the external config layer may override
/// individual entries.
#[derive(Debug, Clone)]
pub struct PhenotypeGlossary {
    entries: BTreeMap<Phenotype, String>,
}

impl Default for PhenotypeGlossary {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            Phenotype::PoorMetabolizer,
            "the enzyme has little or no activity, so the drug is processed much more slowly \
             than usual"
                .to_string(),
        );
        entries.insert(
            Phenotype::IntermediateMetabolizer,
            "the enzyme works at reduced capacity, so the drug is processed more slowly than \
             usual"
                .to_string(),
        );
        entries.insert(
            Phenotype::NormalMetabolizer,
            "the enzyme works as expected, so the drug is processed at the usual rate".to_string(),
        );
        entries.insert(
            Phenotype::RapidMetabolizer,
            "the enzyme is more active than usual, so the drug is processed faster than expected"
                .to_string(),
        );
        entries.insert(
            Phenotype::UltrarapidMetabolizer,
            "the enzyme is markedly overactive, so the drug is processed much faster than \
             expected"
                .to_string(),
        );
        Self { entries }
    }
}

impl PhenotypeGlossary {
    pub fn description(&self, phenotype: Phenotype) -> &str {
        self.entries
            .get(&phenotype)
            .map(String::as_str)
            .unwrap_or("the enzyme's activity differs from the typical range")
    }

    pub fn with_description(mut self, phenotype: Phenotype, text: &str) -> Self {
        self.entries.insert(phenotype, text.to_string());
        self
    }
}

/// Build all four sections deterministically from the structured inputs.
///
/// Guarantees: the phenotype and its plain-language description appear in
/// the summary; every variant's identifier is cited verbatim in at least
/// one section; the mechanism section cites the distinct functional
/// statuses present; the clinical-impact section matches the phenotype's
/// function class.
pub fn build_fallback_explanation(
    request: &ExplanationRequest,
    glossary: &PhenotypeGlossary,
) -> Explanation {
    let drug = &request.drug;
    let gene = &request.gene;
    let phenotype = request.phenotype;

    let summary = format!(
        "Pharmacogenomic review of {drug} response based on the {gene} diplotype {}. \
         The predicted phenotype is {}: {}. This assessment is based on {} matched \
         variant(s).",
        request.diplotype,
        phenotype.label(),
        glossary.description(phenotype),
        request.variants.len()
    );

    let mut biological_mechanism = format!(
        "{gene} encodes an enzyme involved in processing {drug}. Genetic variation in \
         {gene} changes how quickly the drug is activated or cleared, which shifts drug \
         exposure at standard doses."
    );
    let statuses: BTreeSet<&str> = request
        .variants
        .iter()
        .filter_map(|v| v.functional_status.map(|s| s.as_str()))
        .collect();
    if !statuses.is_empty() {
        let listed: Vec<&str> = statuses.into_iter().collect();
        biological_mechanism.push_str(&format!(
            " The detected variants carry the following functional classifications: {}.",
            listed.join(", ")
        ));
    }

    let variant_interpretation = if request.variants.is_empty() {
        "No matched pharmacogenomic variants are available for individual interpretation."
            .to_string()
    } else {
        let mut lines = Vec::with_capacity(request.variants.len());
        for variant in &request.variants {
            let variant_gene = variant.gene.as_deref().unwrap_or(gene);
            let status = variant
                .functional_status
                .map(|s| format!("a {} variant", s.as_str().replace('_', "-")))
                .unwrap_or_else(|| "a variant of unrecorded function".to_string());
            let evidence = variant
                .evidence_level
                .map(|l| format!(" (evidence level {l:?})"))
                .unwrap_or_default();
            lines.push(format!(
                "{} in {variant_gene} is {status}{evidence}.",
                variant.identifier()
            ));
        }
        lines.join(" ")
    };

    let mut clinical_impact = if phenotype.is_reduced_function() {
        format!(
            "Reduced {gene} function is expected to alter {drug} exposure. A dose \
             reduction or an alternative therapy should be considered."
        )
    } else if phenotype.is_increased_function() {
        format!(
            "Increased {gene} activity may change {drug} exposure at standard doses. A \
             higher dose or an alternative therapy may be required; proceed with caution."
        )
    } else {
        format!("Standard dosing of {drug} is appropriate based on this genotype.")
    };
    if !request.recommendation.trim().is_empty() {
        clinical_impact.push_str(&format!(
            " Guideline recommendation: {}",
            request.recommendation.trim()
        ));
    }

    Explanation {
        summary,
        biological_mechanism,
        variant_interpretation,
        clinical_impact,
    }
}
