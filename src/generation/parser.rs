use std::sync::LazyLock;

use regex::Regex;

use super::types::Explanation;

/// The four section markers, in required order. Case-insensitive, tolerant
/// of heading decoration (`##`, `**`, trailing `:`).
static SECTION_MARKERS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\bsummary\b").unwrap(),
        Regex::new(r"(?i)\bbiological\s+mechanism\b").unwrap(),
        Regex::new(r"(?i)\bvariant\s+interpretation\b").unwrap(),
        Regex::new(r"(?i)\bclinical\s+impact\b").unwrap(),
    ]
});

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+").unwrap());

/// Parse a generated response into the four named sections.
///
/// Favors showing something over discarding usable content: markers first,
/// then a numbered-list split, and finally the whole text into `summary`.
pub fn parse_explanation(text: &str) -> Explanation {
    if let Some(explanation) = split_by_markers(text) {
        return explanation;
    }
    if let Some(explanation) = split_numbered(text) {
        return explanation;
    }

    tracing::debug!("No section structure found, placing whole response into summary");
    Explanation {
        summary: text.trim().to_string(),
        ..Default::default()
    }
}

/// Locate the four markers in order; `None` if any is missing.
fn split_by_markers(text: &str) -> Option<Explanation> {
    let mut spans = Vec::with_capacity(4);
    let mut from = 0;
    for marker in SECTION_MARKERS.iter() {
        let m = marker.find_at(text, from)?;
        spans.push((m.start(), m.end()));
        from = m.end();
    }

    let section = |i: usize| {
        let content_start = spans[i].1;
        let content_end = if i + 1 < spans.len() {
            spans[i + 1].0
        } else {
            text.len()
        };
        clean_section(&text[content_start..content_end])
    };

    Some(Explanation {
        summary: section(0),
        biological_mechanism: section(1),
        variant_interpretation: section(2),
        clinical_impact: section(3),
    })
}

/// Fall back to a numbered-list layout (`1. ... 2. ...`); `None` with fewer
/// than four items.
fn split_numbered(text: &str) -> Option<Explanation> {
    let marks: Vec<_> = NUMBERED_ITEM.find_iter(text).collect();
    if marks.len() < 4 {
        return None;
    }

    let part = |i: usize| {
        let start = marks[i].end();
        let end = marks.get(i + 1).map(|m| m.start()).unwrap_or(text.len());
        clean_section(&text[start..end])
    };

    Some(Explanation {
        summary: part(0),
        biological_mechanism: part(1),
        variant_interpretation: part(2),
        clinical_impact: part(3),
    })
}

/// Strip heading decoration and surrounding whitespace from a section body.
fn clean_section(raw: &str) -> String {
    raw.trim_start_matches(|c: char| matches!(c, ':' | '#' | '*' | '-') || c.is_whitespace())
        .trim_end_matches(|c: char| matches!(c, '#' | '*') || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_marker_headings() {
        let text = "Summary: The patient is a poor metabolizer.\n\
                    Biological Mechanism: CYP2D6 activates codeine.\n\
                    Variant Interpretation: rs3892097 is a no-function variant.\n\
                    Clinical Impact: Avoid codeine.";
        let e = parse_explanation(text);
        assert_eq!(e.summary, "The patient is a poor metabolizer.");
        assert_eq!(e.biological_mechanism, "CYP2D6 activates codeine.");
        assert_eq!(e.variant_interpretation, "rs3892097 is a no-function variant.");
        assert_eq!(e.clinical_impact, "Avoid codeine.");
    }

    #[test]
    fn parses_markdown_decorated_headings() {
        let text = "## Summary\nPoor metabolizer.\n\n## Biological Mechanism\nActivation step.\n\n\
                    ## Variant Interpretation\nNo-function allele.\n\n## Clinical Impact\nAvoid.";
        let e = parse_explanation(text);
        assert_eq!(e.summary, "Poor metabolizer.");
        assert_eq!(e.clinical_impact, "Avoid.");
    }

    #[test]
    fn markers_are_case_insensitive() {
        let text = "SUMMARY\na\nBIOLOGICAL MECHANISM\nb\nVARIANT INTERPRETATION\nc\nCLINICAL IMPACT\nd";
        let e = parse_explanation(text);
        assert_eq!(e.summary, "a");
        assert_eq!(e.biological_mechanism, "b");
        assert_eq!(e.variant_interpretation, "c");
        assert_eq!(e.clinical_impact, "d");
    }

    #[test]
    fn falls_back_to_numbered_list() {
        let text = "1. Overall the patient metabolizes slowly.\n\
                    2. The enzyme is inactive.\n\
                    3. rs3892097 explains the loss.\n\
                    4. Use an alternative therapy.";
        let e = parse_explanation(text);
        assert_eq!(e.summary, "Overall the patient metabolizes slowly.");
        assert_eq!(e.biological_mechanism, "The enzyme is inactive.");
        assert_eq!(e.clinical_impact, "Use an alternative therapy.");
    }

    #[test]
    fn unstructured_text_goes_into_summary() {
        let text = "The model produced a single unstructured paragraph about the variants.";
        let e = parse_explanation(text);
        assert_eq!(e.summary, text);
        assert!(e.biological_mechanism.is_empty());
        assert!(e.variant_interpretation.is_empty());
        assert!(e.clinical_impact.is_empty());
    }

    #[test]
    fn three_numbered_items_are_not_enough() {
        let text = "1. one\n2. two\n3. three";
        let e = parse_explanation(text);
        assert_eq!(e.summary, text);
        assert!(e.clinical_impact.is_empty());
    }

    #[test]
    fn markers_out_of_order_degrade_to_summary() {
        let text = "Clinical Impact: x. Summary: y. Biological Mechanism: z. Variant Interpretation: w.";
        let e = parse_explanation(text);
        // "Summary" is found, but the remaining markers cannot all be
        // located after it in order, so the whole text lands in summary.
        assert!(e.summary.contains("Clinical Impact"));
        assert!(e.biological_mechanism.is_empty());
    }
}
