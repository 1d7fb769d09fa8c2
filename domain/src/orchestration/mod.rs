//! Orchestration domain
//!
//! Text-level rules used by the orchestration engine. The engine itself
//! (sequential, concurrent and handoff shapes) lives in the application
//! layer because it drives async agent calls.

pub mod handoff;
pub mod value_objects;
