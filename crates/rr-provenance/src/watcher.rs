// watcher.rs — Bounded polling wait for the provenance manifest.
//
// The manifest-producing plugin finalizes its output only after the
// completion hook has already started, so an indefinite wait can never be
// guaranteed to succeed. The bound exists to avoid delaying delivery when
// the plugin is merely slow; exhausting it is a warning and the pipeline
// proceeds without provenance enrichment.

use std::thread;
use std::time::Duration;

use rr_storage::{Store, StorageError};

/// Resolution of one manifest wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Whether the manifest appeared (non-empty) within the window.
    pub found: bool,

    /// Existence checks performed before resolving.
    pub attempts: u32,

    /// Observed manifest size when found.
    pub size: Option<u64>,
}

/// Poll `path` until it exists with content, up to `max_wait`.
///
/// Performs `max_wait / poll_interval` checks (integer division, at least
/// one), sleeping `poll_interval` between them. A path present on the first
/// check returns without sleeping at all. Not-found after exhaustion is a
/// normal outcome; only storage backend failures (credentials, transport)
/// are errors.
pub fn wait_for_manifest(
    store: &Store<'_>,
    path: &str,
    max_wait: Duration,
    poll_interval: Duration,
) -> Result<WaitOutcome, StorageError> {
    let interval_ms = poll_interval.as_millis().max(1);
    let attempts = ((max_wait.as_millis() / interval_ms).max(1)) as u32;

    tracing::info!(
        "waiting for provenance manifest at {} (up to {} checks, {}ms apart)",
        path,
        attempts,
        interval_ms
    );

    for attempt in 1..=attempts {
        let size = store.size(path)?;
        if size > 0 {
            tracing::info!(
                "provenance manifest found after {} attempt(s), {} bytes",
                attempt,
                size
            );
            return Ok(WaitOutcome {
                found: true,
                attempts: attempt,
                size: Some(size),
            });
        }
        if attempt < attempts {
            thread::sleep(poll_interval);
        }
    }

    tracing::warn!(
        "provenance manifest not found at {} after {} attempts; proceeding without enrichment",
        path,
        attempts
    );
    Ok(WaitOutcome {
        found: false,
        attempts,
        size: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use rr_exec::{CommandOutput, CommandRunner, ExecError};

    /// Runner that always reports an AccessDenied failure from the backend.
    struct DeniedRunner;

    impl CommandRunner for DeniedRunner {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput, ExecError> {
            Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "An error occurred (AccessDenied) when calling ListObjectsV2".into(),
            })
        }
    }

    /// Runner for local-path tests; the store never invokes it.
    struct UnusedRunner;

    impl CommandRunner for UnusedRunner {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput, ExecError> {
            panic!("local paths must not shell out");
        }
    }

    #[test]
    fn present_path_resolves_on_first_check_without_sleeping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro-crate-metadata.json");
        std::fs::write(&path, "{\"@graph\":[]}").unwrap();

        let runner = UnusedRunner;
        let store = Store::new(&runner);
        let started = Instant::now();
        let outcome = wait_for_manifest(
            &store,
            &path.to_string_lossy(),
            Duration::from_secs(60),
            Duration::from_millis(500),
        )
        .unwrap();

        assert!(outcome.found);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.size, Some(13));
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn absent_path_uses_all_attempts_then_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.json");

        let runner = UnusedRunner;
        let store = Store::new(&runner);
        let started = Instant::now();
        let outcome = wait_for_manifest(
            &store,
            &path.to_string_lossy(),
            Duration::from_secs(2),
            Duration::from_millis(500),
        )
        .unwrap();

        assert!(!outcome.found);
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.size, None);
        // Three sleeps between four checks.
        assert!(started.elapsed() >= Duration::from_millis(1400));
        assert!(started.elapsed() < Duration::from_millis(3000));
    }

    #[test]
    fn path_appearing_mid_wait_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.json");
        let write_path = path.clone();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            std::fs::write(&write_path, "content").unwrap();
        });

        let runner = UnusedRunner;
        let store = Store::new(&runner);
        let outcome = wait_for_manifest(
            &store,
            &path.to_string_lossy(),
            Duration::from_secs(5),
            Duration::from_millis(100),
        )
        .unwrap();
        writer.join().unwrap();

        assert!(outcome.found);
        assert!(outcome.attempts > 1);
        assert_eq!(outcome.size, Some(7));
    }

    #[test]
    fn zero_length_manifest_does_not_count_as_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "").unwrap();

        let runner = UnusedRunner;
        let store = Store::new(&runner);
        let outcome = wait_for_manifest(
            &store,
            &path.to_string_lossy(),
            Duration::from_millis(200),
            Duration::from_millis(100),
        )
        .unwrap();
        assert!(!outcome.found);
    }

    #[test]
    fn backend_failure_propagates_instead_of_polling() {
        let runner = DeniedRunner;
        let store = Store::new(&runner);
        let err = wait_for_manifest(
            &store,
            "s3://bucket/run/ro-crate-metadata.json",
            Duration::from_secs(60),
            Duration::from_millis(500),
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Backend { .. }));
    }
}
