//! # Services Module
//!
//! Implements the relayer pipeline building blocks: key pool loading and
//! selection, per-address serialization, nonce allocation and transaction
//! submission.

mod gate;
pub use gate::*;

mod key_pool;
pub use key_pool::*;

mod nonce;
pub use nonce::*;

mod provider;
pub use provider::*;

mod submitter;
pub use submitter::*;
