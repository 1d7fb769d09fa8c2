//! Orchestration value objects

use serde::{Deserialize, Serialize};

/// Why a handoff chain stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "target")]
pub enum HandoffTermination {
    /// The last response did not request a handoff.
    NoMatch,
    /// The last response named an agent that is not in the routing table.
    UnknownTarget(String),
    /// The hop limit was reached while handoffs were still being requested.
    HopLimit,
}

impl HandoffTermination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::UnknownTarget(_) => "unknown_target",
            Self::HopLimit => "hop_limit",
        }
    }
}

/// Result of a handoff run (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffOutcome {
    /// The last response obtained; returned to the caller as-is.
    pub response: String,
    /// Name of the agent that produced `response`.
    pub final_agent: String,
    /// Number of handoffs performed (0 when the initial agent answered).
    pub hops: usize,
    pub termination: HandoffTermination,
}
