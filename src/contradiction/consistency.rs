use super::claims::extract_biological_claims;
use super::types::{
    BiologicalClaim, ClaimDirection, ClaimKind, Contradiction, ContradictionKind,
    ContradictionReport, Severity,
};
use crate::models::{FunctionalStatus, VariantRecord};

/// Check enzyme-activity claims against the functional status of the
/// variant they reference.
///
/// A claim carrying a variant token is matched by rsID or star allele only;
/// a claim without one matches by gene-symbol equality against the claim
/// subject. Claims that match nothing, and variants without a recorded
/// functional status, are silently ignored.
pub fn check_enzyme_activity_consistency(
    claims: &[BiologicalClaim],
    variants: &[VariantRecord],
) -> Vec<Contradiction> {
    let mut contradictions = Vec::new();

    for claim in claims.iter().filter(|c| c.kind == ClaimKind::EnzymeActivity) {
        let record = match &claim.variant_mentioned {
            Some(token) => variants.iter().find(|v| {
                v.rsid.as_deref() == Some(token.as_str())
                    || v.star_allele.as_deref() == Some(token.as_str())
            }),
            None => variants
                .iter()
                .find(|v| v.gene.as_deref() == Some(claim.subject.as_str())),
        };
        let Some(record) = record else { continue };
        let Some(status) = record.functional_status else {
            continue;
        };

        // Compatibility table: only the listed violations are flagged.
        let severity = match (status, claim.direction) {
            (FunctionalStatus::NoFunction, ClaimDirection::Increase) => Some(Severity::High),
            (FunctionalStatus::Decreased, ClaimDirection::Increase) => Some(Severity::Medium),
            (FunctionalStatus::Increased, ClaimDirection::Decrease) => Some(Severity::Medium),
            _ => None,
        };

        if let Some(severity) = severity {
            contradictions.push(Contradiction {
                kind: ContradictionKind::EnzymeActivityMismatch,
                severity,
                affected: record.identifier(),
                reason: format!(
                    "text claims {} activity for {} but the matched variant has {} status",
                    claim.direction.as_str(),
                    claim.subject,
                    status.as_str()
                ),
            });
        }
    }

    contradictions
}

/// Flag claim groups that assert both an increase and a decrease or
/// elimination for the same variant or subject.
///
/// Catches self-contradictory text even when no structured evidence
/// disagrees with either individual claim. Claims carrying only the
/// generic placeholder subject are left out of grouping: two unrelated
/// gene-less sentences are not evidence of one enzyme being described
/// both ways.
pub fn check_internal_consistency(claims: &[BiologicalClaim]) -> Vec<Contradiction> {
    // Insertion-ordered groups keyed by variant token, else subject.
    let mut groups: Vec<(String, bool, bool)> = Vec::new();

    for claim in claims {
        if claim.variant_mentioned.is_none() && claim.subject == super::claims::GENERIC_SUBJECT {
            continue;
        }
        let key = claim
            .variant_mentioned
            .clone()
            .unwrap_or_else(|| claim.subject.clone());
        let entry = match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some(entry) => entry,
            None => {
                groups.push((key, false, false));
                // Just pushed, so the vec is non-empty.
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };
        match claim.direction {
            ClaimDirection::Increase => entry.1 = true,
            ClaimDirection::Decrease | ClaimDirection::Eliminate => entry.2 = true,
        }
    }

    groups
        .into_iter()
        .filter(|(_, increased, decreased)| *increased && *decreased)
        .map(|(key, _, _)| Contradiction {
            kind: ContradictionKind::InternalContradiction,
            severity: Severity::High,
            affected: key.clone(),
            reason: format!(
                "text asserts both increased and decreased/eliminated effect for {key}"
            ),
        })
        .collect()
}

/// Run one extraction pass and both consistency checks over the same claim
/// set. Pure and side-effect-free; safe to invoke post-hoc for audit
/// without affecting an already-returned explanation.
pub fn detect_contradictions(text: &str, variants: &[VariantRecord]) -> ContradictionReport {
    let claims = extract_biological_claims(text);

    let mut contradictions = check_enzyme_activity_consistency(&claims, variants);
    contradictions.extend(check_internal_consistency(&claims));

    tracing::debug!(
        claims = claims.len(),
        contradictions = contradictions.len(),
        "Contradiction scan complete"
    );

    ContradictionReport {
        has_contradictions: !contradictions.is_empty(),
        claims_analyzed: claims.len(),
        contradictions,
    }
}
