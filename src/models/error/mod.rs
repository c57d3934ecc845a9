//! Error types surfaced by the relayer pipeline.

mod nonce_allocator;
pub use nonce_allocator::*;

mod provider;
pub use provider::*;

mod relayer;
pub use relayer::*;
