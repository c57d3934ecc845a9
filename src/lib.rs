//! Relayer Pool Transaction Pipeline
//!
//! This library coordinates a shared set of hot relayer wallets used to
//! broadcast EVM transactions on behalf of end users. It covers:
//!
//! - Loading pool-scoped relayer keys from environment sources
//! - Selecting a signing key per request (round-robin, sticky, required)
//! - Serializing submissions per signer address within a process
//! - Allocating nonces safely across multiple server instances
//! - Retrying nonce-conflict errors with bounded backoff
//!
//! # Module Structure
//!
//! - `config`: Pool and runtime configuration from environment sources
//! - `constants`: Tuning constants for scanning, retries and backoff
//! - `domain`: The `RelayerRouter` orchestration context
//! - `logging`: Logging setup with file rolling
//! - `models`: Core data structures and error types
//! - `services`: Key pool loading, selection, gating, nonce allocation and
//!   transaction submission
//! - `utils`: Common helpers

pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
