//! Session domain
//!
//! Role-tagged messages exchanged with the completion service and persisted
//! by session stores.

pub mod entities;
