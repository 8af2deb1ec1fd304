// check.rs — Verify the environment without sending anything.
//
// Lets operators validate a compute environment's wiring (client binary,
// credentials) before the first real run, with the same cause slugs and
// exit codes the notify pipeline would produce.

use rr_exec::SystemRunner;
use rr_pipeline::{check_credentials, check_queue_client};

pub fn execute() -> i32 {
    match which::which("aws") {
        Ok(path) => tracing::info!("queue client binary: {}", path.display()),
        Err(e) => tracing::warn!("queue client not resolved on PATH: {e}"),
    }

    let runner = SystemRunner;
    let result = check_queue_client(&runner).and_then(|_| check_credentials(&runner).map(|_| ()));

    match result {
        Ok(()) => {
            tracing::info!("environment ready");
            0
        }
        Err(e) => {
            tracing::error!("{e}");
            if let Some(fix) = e.remediation() {
                tracing::error!("remediation: {fix}");
            }
            tracing::error!("{}", e.cause());
            e.exit_code()
        }
    }
}
