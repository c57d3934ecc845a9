//! # Models Module
//!
//! Contains core data structures and type definitions for the relayer pool.

mod address;
pub use address::*;

mod relayer_key;
pub use relayer_key::*;

mod secret_string;
pub use secret_string::*;

mod error;
pub use error::*;
