//! Content safety domain
//!
//! Classification of inbound text and PII redaction of outbound text.

pub mod gate;
mod patterns;
pub mod result;
