// error.rs — Pipeline error taxonomy.
//
// Everything above the prerequisite gate is recoverable-by-omission except
// dispatch failure. Each variant maps to a stable cause slug (the last
// diagnostic line the hook sees) and a distinct process exit code.

use thiserror::Error;

use rr_notify::DispatchError;
use rr_storage::StorageError;

/// Fatal pipeline failures. Manifest timeout and malformed manifests are
/// absorbed upstream and never reach this enum.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The run did not succeed; only successful runs are reported.
    #[error("run was not successful; notification skipped")]
    RunNotSuccessful,

    /// The queue client tool is missing or broken.
    #[error("queue client unavailable: {detail}")]
    MissingTool { detail: String },

    /// Ambient credentials are missing or invalid.
    #[error("credentials not configured: {detail}")]
    MissingCredentials { detail: String },

    /// The storage backend failed while checking for or reading the
    /// manifest — the environment itself is misconfigured.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The single delivery attempt failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl PipelineError {
    /// Stable cause slug for the final diagnostic line.
    pub fn cause(&self) -> String {
        match self {
            PipelineError::RunNotSuccessful => "run-not-successful".to_string(),
            PipelineError::MissingTool { .. } => "missing-tool".to_string(),
            PipelineError::MissingCredentials { .. } => "missing-credentials".to_string(),
            PipelineError::Storage(_) => "storage-error".to_string(),
            PipelineError::Dispatch(DispatchError::Rejected { classification, .. }) => {
                format!("dispatch-failed:{classification}")
            }
            PipelineError::Dispatch(_) => "dispatch-failed:unclassified".to_string(),
        }
    }

    /// Process exit code for this abort cause.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::RunNotSuccessful => 1,
            PipelineError::MissingTool { .. } => 2,
            PipelineError::MissingCredentials { .. } => 3,
            PipelineError::Storage(_) => 4,
            PipelineError::Dispatch(_) => 5,
        }
    }

    /// Operator remediation text, when there is a known fix.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            PipelineError::MissingTool { .. } => Some(
                "Install the AWS CLI in the compute environment and make sure `aws` is on PATH.",
            ),
            PipelineError::MissingCredentials { .. } => Some(
                "Configure AWS credentials for the compute environment (environment variables, \
                 instance profile, or `aws configure`).",
            ),
            PipelineError::Dispatch(DispatchError::Rejected { classification, .. }) => {
                use rr_notify::DispatchFailure::*;
                match classification {
                    QueueNotFound => {
                        Some("Verify the queue URL and region; the queue does not exist.")
                    }
                    AccessDenied => Some(
                        "Grant sqs:SendMessage on the queue to this compute environment's role.",
                    ),
                    InvalidCredentials => Some(
                        "Refresh or reconfigure AWS credentials for the compute environment.",
                    ),
                    Unclassified => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rr_notify::DispatchFailure;

    #[test]
    fn cause_slugs_match_the_abort_contract() {
        assert_eq!(PipelineError::RunNotSuccessful.cause(), "run-not-successful");
        assert_eq!(
            PipelineError::MissingTool { detail: "x".into() }.cause(),
            "missing-tool"
        );
        assert_eq!(
            PipelineError::MissingCredentials { detail: "x".into() }.cause(),
            "missing-credentials"
        );
        let dispatch = PipelineError::Dispatch(DispatchError::Rejected {
            classification: DispatchFailure::AccessDenied,
            diagnostic: String::new(),
        });
        assert_eq!(dispatch.cause(), "dispatch-failed:access-denied");
    }

    #[test]
    fn every_abort_cause_has_a_nonzero_exit_code() {
        assert_eq!(PipelineError::RunNotSuccessful.exit_code(), 1);
        assert_eq!(
            PipelineError::MissingTool { detail: "x".into() }.exit_code(),
            2
        );
        assert_eq!(
            PipelineError::MissingCredentials { detail: "x".into() }.exit_code(),
            3
        );
    }
}
