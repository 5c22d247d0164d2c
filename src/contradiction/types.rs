use serde::{Deserialize, Serialize};

/// Which claim family a sentence asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    EnzymeActivity,
    DrugEfficacy,
}

/// Asserted direction of change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimDirection {
    Increase,
    Decrease,
    Eliminate,
}

impl ClaimDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increased",
            Self::Decrease => "decreased",
            Self::Eliminate => "eliminated",
        }
    }
}

/// An assertion extracted from generated text. Ephemeral: produced and
/// consumed within a single validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiologicalClaim {
    pub kind: ClaimKind,
    pub direction: ClaimDirection,
    /// Gene symbol, drug name, or the literal `enzyme` when no subject
    /// token was found.
    pub subject: String,
    /// rsID or star-allele token found near the assertion, when present.
    pub variant_mentioned: Option<String>,
    /// Byte offset of the triggering phrase; claims are ordered by
    /// appearance in the text.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    EnzymeActivityMismatch,
    InternalContradiction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

/// A detected inconsistency between generated text and evidence, or within
/// the text itself. Returned for disclosure/audit; no automatic
/// remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub kind: ContradictionKind,
    pub severity: Severity,
    /// rsID preferred, else star allele, else the claim subject.
    pub affected: String,
    /// Human-readable explanation for the audit log.
    pub reason: String,
}

/// Outcome of one full detection pass over a generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionReport {
    pub has_contradictions: bool,
    pub contradictions: Vec<Contradiction>,
    /// Count of extracted claims regardless of outcome, so callers can
    /// assert "claims were found" independently of consistency.
    pub claims_analyzed: usize,
}
