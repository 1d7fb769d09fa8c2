//! Agent implementations built on the application ports

pub mod completion_agent;
