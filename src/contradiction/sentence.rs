//! Sentence splitting with byte offsets, tuned for generated clinical
//! prose. Character-based to avoid lookbehind (unsupported by the regex
//! crate); handles common abbreviations to avoid false splits.

/// Abbreviations that end with a period but are not sentence boundaries.
const ABBREVIATIONS: &[&str] = &["e.g.", "i.e.", "et al.", "vs.", "approx.", "ca.", "cf.", "no."];

/// A sentence with the byte offset of its first character in the source.
#[derive(Debug, Clone)]
pub(crate) struct Sentence<'a> {
    pub text: &'a str,
    pub offset: usize,
}

fn ends_with_abbreviation(text: &str, period_pos: usize) -> bool {
    let prefix = &text.as_bytes()[..=period_pos];
    ABBREVIATIONS.iter().any(|abbr| {
        let abbr = abbr.as_bytes();
        prefix.len() >= abbr.len()
            && prefix[prefix.len() - abbr.len()..].eq_ignore_ascii_case(abbr)
    })
}

/// True when the byte at `pos` is past the end or whitespace.
fn breaks_after(text: &str, pos: usize) -> bool {
    match text[pos..].chars().next() {
        None => true,
        Some(c) => c.is_whitespace(),
    }
}

/// Split text into trimmed sentences, tracking byte offsets.
pub(crate) fn split_sentences<'a>(text: &'a str) -> Vec<Sentence<'a>> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    let flush = |start: usize, end: usize, out: &mut Vec<Sentence<'a>>| {
        let raw = &text[start..end];
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let lead = raw.len() - raw.trim_start().len();
            out.push(Sentence {
                text: trimmed,
                offset: start + lead,
            });
        }
    };

    while i < bytes.len() {
        let c = bytes[i];
        let split_here = match c {
            b'.' => !ends_with_abbreviation(text, i) && breaks_after(text, i + 1),
            b'!' | b'?' => breaks_after(text, i + 1),
            b'\n' => true,
            _ => false,
        };

        if split_here {
            let end = if c == b'\n' { i } else { i + 1 };
            flush(start, end, &mut sentences);
            i += 1;
            start = i;
        } else {
            i += 1;
        }
    }

    flush(start, text.len(), &mut sentences);
    sentences
}
