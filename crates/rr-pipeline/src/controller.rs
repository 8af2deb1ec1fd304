// controller.rs — Pipeline controller state machine.
//
// One linear pass per job completion:
//   Init → PrereqsOk → WaitingForManifest → ManifestResolved
//     → MetadataBuilt → Dispatched → Done
// with Aborted absorbing from any state. Manifest absence and malformed
// manifests are resolutions, not failures; prerequisite, storage-backend,
// and dispatch failures abort.

use std::fmt;
use std::time::Duration;

use chrono::Utc;

use rr_exec::CommandRunner;
use rr_notify::{build, send, DispatchReceipt, NotificationPayload, RunContext};
use rr_provenance::{extract, wait_for_manifest, ExtractedMetadata, WaitOutcome, MANIFEST_FILENAME};
use rr_storage::Store;

use crate::error::PipelineError;
use crate::prereqs;

/// Lifecycle state of one pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    PrereqsOk,
    WaitingForManifest,
    ManifestResolved,
    MetadataBuilt,
    Dispatched,
    Done,
    Aborted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Init => "init",
            PipelineState::PrereqsOk => "prereqs_ok",
            PipelineState::WaitingForManifest => "waiting_for_manifest",
            PipelineState::ManifestResolved => "manifest_resolved",
            PipelineState::MetadataBuilt => "metadata_built",
            PipelineState::Dispatched => "dispatched",
            PipelineState::Done => "done",
            PipelineState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

impl PipelineState {
    /// Whether moving from this state to `next` is a valid transition.
    pub fn can_transition_to(&self, next: &PipelineState) -> bool {
        // Abort is reachable from every non-terminal state.
        if matches!(next, PipelineState::Aborted) {
            return !matches!(self, PipelineState::Done | PipelineState::Aborted);
        }

        matches!(
            (self, next),
            (PipelineState::Init, PipelineState::PrereqsOk)
                | (PipelineState::PrereqsOk, PipelineState::WaitingForManifest)
                | (PipelineState::WaitingForManifest, PipelineState::ManifestResolved)
                | (PipelineState::ManifestResolved, PipelineState::MetadataBuilt)
                | (PipelineState::MetadataBuilt, PipelineState::Dispatched)
                | (PipelineState::Dispatched, PipelineState::Done)
        )
    }
}

/// Tunables for the manifest wait and extraction.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Upper bound on the manifest wait.
    pub max_wait: Duration,

    /// Pause between manifest existence checks.
    pub poll_interval: Duration,

    /// Filename of the workflow-file entity to look for in the manifest.
    pub main_script: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            main_script: "main.nf".to_string(),
        }
    }
}

/// What a completed pipeline run produced, kept for logging and tests.
#[derive(Debug)]
pub struct PipelineReport {
    /// The payload that went out.
    pub payload: NotificationPayload,

    /// Queue acknowledgment.
    pub receipt: DispatchReceipt,

    /// How the manifest wait resolved.
    pub manifest: WaitOutcome,
}

/// Sequences the pipeline stages and owns the fail-fast contract.
pub struct Controller<'a> {
    runner: &'a dyn CommandRunner,
    state: PipelineState,
}

impl<'a> Controller<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            state: PipelineState::Init,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("pipeline state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Execute the full pipeline for one completed run.
    ///
    /// On error the controller lands in [`PipelineState::Aborted`] and the
    /// returned [`PipelineError`] carries the cause slug, exit code, and
    /// remediation text.
    pub fn run(
        &mut self,
        context: &RunContext,
        options: &PipelineOptions,
    ) -> Result<PipelineReport, PipelineError> {
        let result = self.execute(context, options);
        if let Err(e) = &result {
            self.advance(PipelineState::Aborted);
            tracing::error!("{e}");
            if let Some(fix) = e.remediation() {
                tracing::error!("remediation: {fix}");
            }
            // The cause slug is the last line the hook sees.
            tracing::error!("{}", e.cause());
        }
        result
    }

    fn execute(
        &mut self,
        context: &RunContext,
        options: &PipelineOptions,
    ) -> Result<PipelineReport, PipelineError> {
        // Business rule: only successful runs are reported downstream.
        // Checked before any external call.
        if !context.success {
            return Err(PipelineError::RunNotSuccessful);
        }

        prereqs::check_queue_client(self.runner)?;
        prereqs::check_credentials(self.runner)?;
        self.advance(PipelineState::PrereqsOk);

        self.advance(PipelineState::WaitingForManifest);
        let store = Store::new(self.runner);
        let manifest_path = format!(
            "{}/{}",
            context.outdir.trim_end_matches('/'),
            MANIFEST_FILENAME
        );
        let manifest = wait_for_manifest(
            &store,
            &manifest_path,
            options.max_wait,
            options.poll_interval,
        )?;
        self.advance(PipelineState::ManifestResolved);

        let extracted = if manifest.found {
            match store.read(&manifest_path)? {
                Some(raw) => extract(&raw, &options.main_script),
                None => {
                    tracing::warn!("manifest disappeared between wait and read");
                    ExtractedMetadata::new()
                }
            }
        } else {
            ExtractedMetadata::new()
        };

        let payload = build(context, &extracted, Utc::now());
        self.advance(PipelineState::MetadataBuilt);

        // Delivery is single-attempt and irreversible, so the complete
        // outgoing payload goes to the log first.
        let body = payload
            .to_json()
            .map_err(rr_notify::DispatchError::Serialize)?;
        tracing::info!("outgoing payload: {}", body);

        let receipt = send(self.runner, &context.queue_url, &context.region, &payload)?;
        self.advance(PipelineState::Dispatched);
        self.advance(PipelineState::Done);

        Ok(PipelineReport {
            payload,
            receipt,
            manifest,
        })
    }
}
