//! Integration test for file logging.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: when using file mode, the directory of the log file
//!   Refer to `src/logging/mod.rs` for more details.
use std::{env, fs, sync::Mutex};

use lazy_static::lazy_static;
use relayer_pool::logging::{compute_rolled_file_path, setup_logging, space_based_rolling};
use tempfile::TempDir;

lazy_static! {
    // Logging tests mutate process environment; keep them serialized. A
    // panicking test (should_panic below) poisons the mutex by design.
    static ref ENV_MUTEX: Mutex<()> = Mutex::new(());
}

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
#[should_panic(expected = "LOG_MAX_SIZE must be a valid u64 if set")]
fn test_invalid_log_max_size_panics() {
    let _lock = env_lock();
    let temp_dir = TempDir::new().unwrap();
    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_DATA_DIR", temp_dir.path().to_str().unwrap());
    env::set_var("LOG_MAX_SIZE", "not-a-number");

    setup_logging();
}

#[test]
fn test_file_mode_creates_log_file() {
    let _lock = env_lock();
    let temp_dir = TempDir::new().unwrap();
    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_LEVEL", "info");
    env::set_var("LOG_DATA_DIR", temp_dir.path().to_str().unwrap());
    env::remove_var("LOG_MAX_SIZE");

    setup_logging();
    log::info!("pipeline logging smoke test");

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("relayer-pool"));
    assert!(entries[0].ends_with(".log"));

    env::remove_var("LOG_MODE");
    env::remove_var("LOG_LEVEL");
    env::remove_var("LOG_DATA_DIR");
}

#[test]
fn test_rolling_is_stable_across_restarts() {
    let _lock = env_lock();
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir
        .path()
        .join("relayer-pool.log")
        .to_str()
        .unwrap()
        .to_string();

    // Nothing on disk: the time-based name is used as-is.
    let first = compute_rolled_file_path(&base, "2026-08-31", 1);
    assert_eq!(space_based_rolling(&first, &base, "2026-08-31", 64), first);

    // An oversized file forces the next sequence number.
    fs::write(&first, vec![0u8; 128]).unwrap();
    let rolled = compute_rolled_file_path(&base, "2026-08-31", 2);
    assert_eq!(
        space_based_rolling(&first, &base, "2026-08-31", 64),
        rolled
    );
}
