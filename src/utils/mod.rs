//! Common utilities and helper functions.

mod key;
pub use key::*;
