//! Integration test for [`message_store::init_tracing`].
//!
//! Runs in its own test binary because it installs the global subscriber.

use message_store::init_tracing;

/// **Test: Tracing initializes once with a log file; a second call errors.**
///
/// **Setup:** Temp dir for the log file.
/// **Action:** `init_tracing(Some(path))`, emit an event, call `init_tracing(None)` again.
/// **Expected:** First call succeeds and creates the file; second call returns an error.
#[test]
fn test_init_tracing_once() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let log_path = temp_dir.path().join("messages.log");
    let log_path = log_path.to_str().unwrap().to_string();

    init_tracing(Some(&log_path)).expect("First init should succeed");
    tracing::info!(id = "m1", "tracing initialized");

    assert!(std::path::Path::new(&log_path).exists());
    assert!(init_tracing(None).is_err());
}
