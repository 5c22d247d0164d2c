use super::types::ExplanationRequest;

pub const EXPLANATION_SYSTEM_PROMPT: &str = r#"You are a clinical pharmacogenomics writer. You explain how a patient's genetic variants affect their response to a specific drug. You are NOT giving medical advice; the report is reviewed by a clinician.

ABSOLUTE RULES — NO EXCEPTIONS:
1. Ground every statement in the variant evidence provided below. Never invent variants, genes, rsIDs, or star alleles.
2. Never contradict the functional status given for a variant. A no-function variant cannot increase enzyme activity.
3. Cite each variant by its rsID or star allele exactly as written in the evidence.
4. Use plain, clinician-readable language. Explain jargon on first use.
5. Do not state dosing numbers beyond what the guideline recommendation says.

OUTPUT FORMAT:
Produce exactly four sections, headed exactly:
Summary
Biological Mechanism
Variant Interpretation
Clinical Impact"#;

/// Lay out the structured context for one drug's explanation.
pub fn build_explanation_prompt(request: &ExplanationRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Drug: {}\n", request.drug));
    prompt.push_str(&format!("Gene: {}\n", request.gene));
    prompt.push_str(&format!("Diplotype: {}\n", request.diplotype));
    prompt.push_str(&format!("Phenotype: {}\n", request.phenotype.label()));
    prompt.push_str(&format!(
        "Guideline recommendation: {}\n\n",
        request.recommendation
    ));

    prompt.push_str("<VARIANT_EVIDENCE>\n");
    if request.variants.is_empty() {
        prompt.push_str("(no matched variants)\n");
    }
    for variant in &request.variants {
        let gene = variant.gene.as_deref().unwrap_or(&request.gene);
        let status = variant
            .functional_status
            .map(|s| s.as_str())
            .unwrap_or("unrecorded");
        let evidence = variant
            .evidence_level
            .map(|l| format!("{l:?}"))
            .unwrap_or_else(|| "unknown".to_string());
        prompt.push_str(&format!(
            "- {} ({gene}, function: {status}, evidence: {evidence}, quality: {:.1})\n",
            variant.identifier(),
            variant.quality_score
        ));
    }
    prompt.push_str("</VARIANT_EVIDENCE>\n\n");

    prompt.push_str(
        "Write the explanation now with the four exact section headings: \
         Summary, Biological Mechanism, Variant Interpretation, Clinical Impact.",
    );

    prompt
}
