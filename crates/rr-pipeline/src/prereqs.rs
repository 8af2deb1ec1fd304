// prereqs.rs — Environment prerequisite checks.
//
// Both checks run before any real work: a missing queue client or broken
// credentials means nothing later in the pipeline can succeed, and the
// operator gets remediation text instead of a confusing dispatch failure.

use rr_exec::CommandRunner;
use serde_json::Value;

use crate::error::PipelineError;

/// Who the ambient credentials authenticate as.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
}

/// Verify the queue client tool is installed and runnable.
///
/// Returns the client's version line for logging. The AWS CLI prints its
/// version to stdout (v2) or stderr (v1); accept either.
pub fn check_queue_client(runner: &dyn CommandRunner) -> Result<String, PipelineError> {
    let out = runner
        .run("aws", &["--version"])
        .map_err(|e| PipelineError::MissingTool {
            detail: e.to_string(),
        })?;

    if !out.success() {
        return Err(PipelineError::MissingTool {
            detail: out.stderr.trim().to_string(),
        });
    }

    let version = if out.stdout.trim().is_empty() {
        out.stderr.trim().to_string()
    } else {
        out.stdout.trim().to_string()
    };
    tracing::info!("queue client found: {}", version);
    Ok(version)
}

/// Verify ambient credentials by asking the identity service who we are.
///
/// Logs the resolved account and role ARN so a run's audit trail shows
/// which principal sent the notification.
pub fn check_credentials(runner: &dyn CommandRunner) -> Result<CallerIdentity, PipelineError> {
    let out = runner
        .run("aws", &["sts", "get-caller-identity", "--output", "json"])
        .map_err(|e| PipelineError::MissingTool {
            detail: e.to_string(),
        })?;

    if !out.success() {
        return Err(PipelineError::MissingCredentials {
            detail: out.stderr.trim().to_string(),
        });
    }

    let identity = serde_json::from_str::<Value>(&out.stdout)
        .map(|v| CallerIdentity {
            account: v.get("Account").and_then(Value::as_str).map(str::to_string),
            arn: v.get("Arn").and_then(Value::as_str).map(str::to_string),
        })
        .unwrap_or_default();

    tracing::info!(
        "credentials valid (account: {}, principal: {})",
        identity.account.as_deref().unwrap_or("unknown"),
        identity.arn.as_deref().unwrap_or("unknown")
    );
    Ok(identity)
}
