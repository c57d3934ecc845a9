//! This module contains all the constant values used in the system
mod relayer;
pub use relayer::*;

mod transaction;
pub use transaction::*;
