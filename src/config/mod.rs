//! Configuration system for the relayer pool.
//!
//! This module handles:
//! - Pool key-source descriptors and their standard environment naming
//! - The `KeySource` abstraction over environment variables (swappable for
//!   an in-memory map in tests)
//! - Runtime settings: the shared-allocator toggle and retry overrides
mod pool;
pub use pool::*;

mod relayer_config;
pub use relayer_config::*;
