//! # Domain Module
//!
//! Orchestration of the relayer pipeline.

mod router;
pub use router::*;
