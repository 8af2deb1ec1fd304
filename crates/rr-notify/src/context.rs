// context.rs — RunContext: the immutable per-invocation run description.
//
// Constructed once at the CLI boundary from flags/environment/config and
// passed by reference into the pipeline. No component reads ambient state
// directly.

use serde::{Deserialize, Serialize};

/// Everything the surrounding job-completion hook tells us about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Output location URI — local path or `s3://` prefix — where the run
    /// wrote its results and where the provenance manifest will appear.
    pub outdir: String,

    /// SQS queue endpoint URL to notify.
    pub queue_url: String,

    /// AWS region of the queue.
    pub region: String,

    /// Workflow tool/runtime version string.
    pub tool_version: Option<String>,

    /// Human-assigned run name.
    pub run_name: Option<String>,

    /// Orchestrator-assigned run identifier.
    pub run_id: Option<String>,

    /// Orchestrator session identifier.
    pub session_id: Option<String>,

    /// Container/image identifier the run executed in.
    pub container: Option<String>,

    /// Whether the run completed successfully. Only successful runs are
    /// reported downstream.
    pub success: bool,
}
