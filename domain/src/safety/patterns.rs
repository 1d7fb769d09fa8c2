//! Fixed pattern sets used by the safety gate.
//!
//! Compiled once on first use.

use super::result::PiiKind;
use regex::Regex;
use std::sync::OnceLock;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in safety pattern is valid")
}

/// PII detectors in check/redaction order.
pub(crate) fn pii_patterns() -> &'static [(PiiKind, Regex)] {
    static PII: OnceLock<Vec<(PiiKind, Regex)>> = OnceLock::new();
    PII.get_or_init(|| {
        PiiKind::ALL
            .iter()
            .map(|kind| {
                let pattern = match kind {
                    PiiKind::Ssn => r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b",
                    PiiKind::CreditCard => r"\b[0-9]{16}\b",
                    PiiKind::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                    PiiKind::Phone => r"\b[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}\b",
                };
                (*kind, compile(pattern))
            })
            .collect()
    })
}

/// Instruction-override phrases, matched case-insensitively.
pub(crate) fn jailbreak_patterns() -> &'static [Regex] {
    static JAILBREAK: OnceLock<Vec<Regex>> = OnceLock::new();
    JAILBREAK.get_or_init(|| {
        [
            r"(?i)ignore (previous|all|your) instructions",
            r"(?i)pretend (you are|to be)",
            r"(?i)act as (if you are|a)",
            r"(?i)disregard (safety|guidelines)",
            r"(?i)bypass (filters|safety)",
        ]
        .iter()
        .map(|p| compile(p))
        .collect()
    })
}
