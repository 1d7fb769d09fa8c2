//! Use cases (application services)

pub mod orchestration;
