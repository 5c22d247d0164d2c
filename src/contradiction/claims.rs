use std::sync::LazyLock;

use regex::Regex;

use super::sentence::split_sentences;
use super::types::{BiologicalClaim, ClaimDirection, ClaimKind};

/// rsID (`rs1234567`) or star-allele (`*4`, `*2A`) token.
static VARIANT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brs\d+\b|\*\d+[A-Za-z0-9]*").unwrap());

/// Candidate gene symbol: uppercase alphanumeric token (CYP2D6, TPMT).
static GENE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Z0-9]{2,9}\b").unwrap());

/// Uppercase tokens that are never gene symbols in this prose.
const GENE_STOPLIST: &[&str] = &[
    "DNA", "RNA", "PGX", "CPIC", "FDA", "EMA", "VCF", "SNP", "LLM", "API", "NOTE",
];

static INCREASE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bincreas(?:e|es|ed|ing)\b|\belevat(?:e|es|ed)\b|\benhanc(?:e|es|ed)\b")
        .unwrap()
});

static DECREASE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bdecreas(?:e|es|ed|ing)\b|\breduc(?:e|es|ed|ing|tion)\b|\bdiminish(?:es|ed)?\b|\blower(?:s|ed)?\b",
    )
    .unwrap()
});

static ELIMINATE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\beliminat(?:e|es|ed|ing)\b|\babolish(?:es|ed)?\b").unwrap()
});

/// A sentence is in enzyme-activity context when it talks about an enzyme
/// or its activity at all.
static ACTIVITY_CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\benzyme\b|\bactivity\b").unwrap());

/// `<drug> efficacy/response [is] <direction>`
static EFFICACY_SUBJECT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([A-Za-z][A-Za-z-]{2,})\s+(?:efficacy|response)\s+(?:is|was|are|were|will\s+be|may\s+be)?\s*\b(increased|elevated|enhanced|improved|decreased|reduced|diminished|lowered)\b",
    )
    .unwrap()
});

/// `<direction> efficacy/response of/to <drug>`
static EFFICACY_DIRECTION_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(increased|elevated|enhanced|improved|decreased|reduced|diminished|lowered)\s+(?:efficacy|response)\s+(?:of|to)\s+([A-Za-z][A-Za-z-]{2,})\b",
    )
    .unwrap()
});

/// Placeholder subject for activity claims with no nearby gene token.
/// Such claims are only matchable through an explicit variant token.
pub(crate) const GENERIC_SUBJECT: &str = "enzyme";

/// Words that the efficacy patterns can capture in subject position but
/// that are never drug names.
const DRUG_STOPLIST: &[&str] = &[
    "the", "this", "that", "its", "their", "drug", "clinical", "patient", "treatment", "therapy",
    "overall", "expected",
];

fn efficacy_direction(word: &str) -> Option<ClaimDirection> {
    let w = word.to_ascii_lowercase();
    if w.starts_with("increas") || w.starts_with("elevat") || w.starts_with("enhanc")
        || w.starts_with("improv")
    {
        Some(ClaimDirection::Increase)
    } else if w.starts_with("decreas") || w.starts_with("reduc") || w.starts_with("diminish")
        || w.starts_with("lower")
    {
        Some(ClaimDirection::Decrease)
    } else {
        None
    }
}

fn is_drug_stopword(word: &str) -> bool {
    DRUG_STOPLIST.iter().any(|s| word.eq_ignore_ascii_case(s))
}

/// Nearest token to `pos`: the closest one before it, else the closest one
/// after. Tokens must be sorted by position.
fn nearest(tokens: &[(usize, String)], pos: usize) -> Option<String> {
    tokens
        .iter()
        .rev()
        .find(|(p, _)| *p < pos)
        .or_else(|| tokens.iter().find(|(p, _)| *p >= pos))
        .map(|(_, t)| t.clone())
}

/// Scan generated text for enzyme-activity and drug-efficacy assertions.
///
/// Phrase-pattern matching only, precision over recall: text with no
/// qualifying phrase yields an empty vec, which is expected and not an
/// error. A single sentence may yield several claims. Claims are returned
/// in order of appearance.
pub fn extract_biological_claims(text: &str) -> Vec<BiologicalClaim> {
    let mut claims = Vec::new();

    for sentence in split_sentences(text) {
        let s = sentence.text;
        let mut found: Vec<BiologicalClaim> = Vec::new();

        let variants: Vec<(usize, String)> = VARIANT_TOKEN
            .find_iter(s)
            .map(|m| (m.start(), m.as_str().to_string()))
            .collect();

        // Drug-efficacy claims first; their spans are excluded from the
        // enzyme scan so one direction word never yields two claims.
        let mut efficacy_spans: Vec<(usize, usize)> = Vec::new();
        for caps in EFFICACY_SUBJECT_FIRST.captures_iter(s) {
            let (Some(whole), Some(subject), Some(dir_word)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if is_drug_stopword(subject.as_str()) {
                continue;
            }
            let Some(direction) = efficacy_direction(dir_word.as_str()) else {
                continue;
            };
            efficacy_spans.push((whole.start(), whole.end()));
            found.push(BiologicalClaim {
                kind: ClaimKind::DrugEfficacy,
                direction,
                subject: subject.as_str().to_string(),
                variant_mentioned: nearest(&variants, whole.start()),
                offset: sentence.offset + whole.start(),
            });
        }
        for caps in EFFICACY_DIRECTION_FIRST.captures_iter(s) {
            let (Some(whole), Some(dir_word), Some(subject)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if is_drug_stopword(subject.as_str()) {
                continue;
            }
            let Some(direction) = efficacy_direction(dir_word.as_str()) else {
                continue;
            };
            efficacy_spans.push((whole.start(), whole.end()));
            found.push(BiologicalClaim {
                kind: ClaimKind::DrugEfficacy,
                direction,
                subject: subject.as_str().to_string(),
                variant_mentioned: nearest(&variants, whole.start()),
                offset: sentence.offset + whole.start(),
            });
        }

        // Enzyme-activity claims: one per direction occurrence in an
        // activity-context sentence.
        if ACTIVITY_CONTEXT.is_match(s) {
            let genes: Vec<(usize, String)> = GENE_TOKEN
                .find_iter(s)
                .filter(|m| !GENE_STOPLIST.contains(&m.as_str()))
                .map(|m| (m.start(), m.as_str().to_string()))
                .collect();

            let mut directions: Vec<(usize, ClaimDirection)> = Vec::new();
            for (regex, direction) in [
                (&*INCREASE_WORDS, ClaimDirection::Increase),
                (&*DECREASE_WORDS, ClaimDirection::Decrease),
                (&*ELIMINATE_WORDS, ClaimDirection::Eliminate),
            ] {
                for m in regex.find_iter(s) {
                    directions.push((m.start(), direction));
                }
            }
            directions.sort_by_key(|(pos, _)| *pos);

            for (pos, direction) in directions {
                let consumed = efficacy_spans
                    .iter()
                    .any(|(start, end)| pos >= *start && pos < *end);
                if consumed {
                    continue;
                }
                // Ambiguity resolution: the claim attaches to the nearest
                // preceding gene token, else the nearest following one.
                let subject =
                    nearest(&genes, pos).unwrap_or_else(|| GENERIC_SUBJECT.to_string());
                found.push(BiologicalClaim {
                    kind: ClaimKind::EnzymeActivity,
                    direction,
                    subject,
                    variant_mentioned: nearest(&variants, pos),
                    offset: sentence.offset + pos,
                });
            }
        }

        found.sort_by_key(|c| c.offset);
        claims.extend(found);
    }

    tracing::debug!(claims = claims.len(), "Biological claim extraction complete");
    claims
}
