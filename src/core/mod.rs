//! Core data structures
//!
//! Everything here is in-memory and synchronous; persistence helpers only
//! format and parse text; the facades in the crate root decide when to write.

pub mod audit;
pub mod config;
pub mod error;
pub mod grid;
pub mod history;
pub mod queue;
pub mod registry;
pub mod snapshot;
pub mod topk;
pub mod validation;
