//! Safety classification results

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Detail reported when a text passes every check.
pub const NO_ISSUES_DETAIL: &str = "No issues detected";

/// Category of a safety violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Text is longer than the configured maximum.
    ExcessiveLength,
    /// Personally identifying information was detected.
    Pii,
    /// An instruction-override phrase was detected.
    Jailbreak,
    /// A caller-supplied blocklist term was found.
    BlockedTerm,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExcessiveLength => "excessive_length",
            Self::Pii => "pii",
            Self::Jailbreak => "jailbreak",
            Self::BlockedTerm => "blocked_term",
        }
    }
}

/// Kind of PII recognised by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    /// National ID in 3-2-4 digit grouping.
    Ssn,
    /// Sixteen consecutive digits.
    CreditCard,
    Email,
    Phone,
}

impl PiiKind {
    /// All kinds, in the order they are checked and redacted.
    pub const ALL: [PiiKind; 4] = [Self::Ssn, Self::CreditCard, Self::Email, Self::Phone];

    /// Human-readable label used in details and redaction markers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ssn => "SSN",
            Self::CreditCard => "Credit Card",
            Self::Email => "Email",
            Self::Phone => "Phone",
        }
    }

    /// Replacement text written over a detected value.
    pub fn redaction(&self) -> String {
        format!("[{} REDACTED]", self.label())
    }
}

/// A single violation found by one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: ViolationKind,
    pub detail: String,
}

impl Finding {
    pub fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Outcome of classifying one text (Value Object).
///
/// `is_safe` is true exactly when the violation set is empty; the type has
/// no way to construct any other combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyResult {
    is_safe: bool,
    violations: BTreeSet<ViolationKind>,
    details: String,
}

impl SafetyResult {
    /// A result with no violations.
    pub fn clean() -> Self {
        Self {
            is_safe: true,
            violations: BTreeSet::new(),
            details: NO_ISSUES_DETAIL.to_string(),
        }
    }

    /// Build a result from the findings of every check.
    ///
    /// Violations are deduplicated by kind; every finding's detail is kept,
    /// joined with `"; "` in check order.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        if findings.is_empty() {
            return Self::clean();
        }

        let violations = findings.iter().map(|f| f.kind).collect();
        let details = findings
            .into_iter()
            .map(|f| f.detail)
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            is_safe: false,
            violations,
            details,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    pub fn violations(&self) -> &BTreeSet<ViolationKind> {
        &self.violations
    }

    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.contains(&kind)
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

impl std::fmt::Display for SafetyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.details)
    }
}
