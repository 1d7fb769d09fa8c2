//! Content safety gate
//!
//! Screens inbound text for length, PII, jailbreak phrasing and blocklisted
//! terms, and redacts PII from outbound text.

use super::patterns::{jailbreak_patterns, pii_patterns};
use super::result::{Finding, PiiKind, SafetyResult, ViolationKind};
use serde::{Deserialize, Serialize};

/// Default upper bound on inbound text, in characters.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 4000;

/// Gate configuration (Value Object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    pub max_input_length: usize,
    /// Report PII found in inbound text.
    pub block_pii: bool,
    /// Report instruction-override phrasing in inbound text.
    pub block_jailbreaks: bool,
    /// Terms rejected case-insensitively anywhere in inbound text.
    pub blocklist: Vec<String>,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            block_pii: true,
            block_jailbreaks: true,
            blocklist: Vec::new(),
        }
    }
}

impl SafetySettings {
    pub fn with_max_input_length(mut self, max: usize) -> Self {
        self.max_input_length = max;
        self
    }

    pub fn with_blocklist<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocklist = terms.into_iter().map(Into::into).collect();
        self
    }
}

/// Stateless classifier and redactor.
#[derive(Debug, Clone, Default)]
pub struct ContentSafetyGate {
    settings: SafetySettings,
    /// Lowercased, non-empty blocklist terms.
    blocked_terms: Vec<String>,
}

impl ContentSafetyGate {
    pub fn new(settings: SafetySettings) -> Self {
        let blocked_terms = settings
            .blocklist
            .iter()
            .filter(|term| !term.is_empty())
            .map(|term| term.to_lowercase())
            .collect();
        Self {
            settings,
            blocked_terms,
        }
    }

    pub fn settings(&self) -> &SafetySettings {
        &self.settings
    }

    /// Classify inbound text.
    ///
    /// All checks run; a text can carry several violations at once.
    pub fn check_input(&self, text: &str) -> SafetyResult {
        let mut findings = Vec::new();

        let length = text.chars().count();
        if length > self.settings.max_input_length {
            findings.push(Finding::new(
                ViolationKind::ExcessiveLength,
                format!(
                    "Input exceeds max length ({} > {})",
                    length, self.settings.max_input_length
                ),
            ));
        }

        if self.settings.block_pii {
            for (kind, pattern) in pii_patterns() {
                if pattern.is_match(text) {
                    findings.push(Finding::new(
                        ViolationKind::Pii,
                        format!("Potential {} detected", kind.label()),
                    ));
                }
            }
        }

        if self.settings.block_jailbreaks && jailbreak_patterns().iter().any(|p| p.is_match(text))
        {
            findings.push(Finding::new(
                ViolationKind::Jailbreak,
                "Potential jailbreak attempt detected",
            ));
        }

        if !self.blocked_terms.is_empty() {
            let lowered = text.to_lowercase();
            // One finding per matching term
            for term in &self.blocked_terms {
                if lowered.contains(term.as_str()) {
                    findings.push(Finding::new(
                        ViolationKind::BlockedTerm,
                        "Blocked term detected",
                    ));
                }
            }
        }

        SafetyResult::from_findings(findings)
    }

    /// Replace every PII occurrence with its redaction marker.
    ///
    /// Redaction runs SSN, credit card, email, phone in that order, so a
    /// span claimed by an earlier kind is never relabelled. Text with no PII
    /// is returned unchanged, and sanitizing twice equals sanitizing once.
    pub fn sanitize_output(&self, text: &str) -> String {
        let mut sanitized = text.to_string();
        for (kind, pattern) in pii_patterns() {
            if pattern.is_match(&sanitized) {
                sanitized = pattern
                    .replace_all(&sanitized, kind.redaction().as_str())
                    .into_owned();
            }
        }
        sanitized
    }

    /// PII kinds present in `text`, in redaction order.
    pub fn detect_pii(&self, text: &str) -> Vec<PiiKind> {
        pii_patterns()
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(kind, _)| *kind)
            .collect()
    }
}
