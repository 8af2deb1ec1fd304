// notify.rs — Run the full notification pipeline for one completed run.
//
// Input layering, highest wins: CLI flag > RUNRELAY_* environment variable
// > settings file > built-in default. The RunContext is assembled here,
// once, at the process boundary — nothing downstream reads ambient state.

use std::time::Duration;

use rr_exec::SystemRunner;
use rr_pipeline::{Controller, PipelineOptions, RunContext};

use crate::config::Settings;

/// Flag-supplied inputs for `runrelay notify`.
pub struct NotifyArgs {
    pub outdir: Option<String>,
    pub queue_url: Option<String>,
    pub region: Option<String>,
    pub max_wait_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub main_script: Option<String>,
}

pub fn execute(settings: &Settings, args: NotifyArgs) -> i32 {
    let defaults = PipelineOptions::default();

    let outdir = args.outdir.or_else(|| env_opt("RUNRELAY_OUTDIR"));
    let queue_url = args
        .queue_url
        .or_else(|| env_opt("RUNRELAY_QUEUE_URL"))
        .or_else(|| settings.queue.url.clone());

    let (outdir, queue_url) = match (outdir, queue_url) {
        (Some(outdir), Some(queue_url)) => (outdir, queue_url),
        (None, _) => return usage_error("outdir", "--outdir", "RUNRELAY_OUTDIR"),
        (_, None) => return usage_error("queue URL", "--queue-url", "RUNRELAY_QUEUE_URL"),
    };

    let region = args
        .region
        .or_else(|| env_opt("RUNRELAY_REGION"))
        .or_else(|| settings.queue.region.clone())
        .unwrap_or_else(|| "us-east-1".to_string());

    let context = RunContext {
        outdir,
        queue_url,
        region,
        tool_version: env_opt("RUNRELAY_TOOL_VERSION"),
        run_name: env_opt("RUNRELAY_RUN_NAME"),
        run_id: env_opt("RUNRELAY_RUN_ID"),
        session_id: env_opt("RUNRELAY_SESSION_ID"),
        container: env_opt("RUNRELAY_CONTAINER"),
        success: env_opt("RUNRELAY_SUCCESS")
            .map(|v| parse_success(&v))
            .unwrap_or(true),
    };

    let options = PipelineOptions {
        max_wait: Duration::from_secs(
            args.max_wait_secs
                .or_else(|| env_u64("RUNRELAY_MAX_WAIT_SECS"))
                .unwrap_or(settings.watch.max_wait_secs),
        ),
        poll_interval: Duration::from_millis(
            args.poll_interval_ms
                .or_else(|| env_u64("RUNRELAY_POLL_INTERVAL_MS"))
                .unwrap_or(settings.watch.poll_interval_ms),
        ),
        main_script: args
            .main_script
            .or_else(|| env_opt("RUNRELAY_MAIN_SCRIPT"))
            .unwrap_or_else(|| settings.manifest.main_script.clone()),
    };
    // A zero poll interval would spin; fall back to the built-in default.
    let options = if options.poll_interval.is_zero() {
        PipelineOptions {
            poll_interval: defaults.poll_interval,
            ..options
        }
    } else {
        options
    };

    tracing::info!(
        "notifying {} for run output at {}",
        context.queue_url,
        context.outdir
    );

    let runner = SystemRunner;
    let mut controller = Controller::new(&runner);
    match controller.run(&context, &options) {
        Ok(report) => {
            tracing::info!(
                "notification delivered (message id: {}, manifest {})",
                report.receipt.message_id.as_deref().unwrap_or("unknown"),
                if report.manifest.found {
                    "found"
                } else {
                    "not found"
                }
            );
            0
        }
        // Cause and remediation were already logged by the controller.
        Err(e) => e.exit_code(),
    }
}

fn usage_error(what: &str, flag: &str, var: &str) -> i32 {
    tracing::error!("missing required input: {what} (pass {flag} or set {var})");
    64
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(name: &str) -> Option<u64> {
    env_opt(name).and_then(|v| v.parse().ok())
}

/// Interpret the hook-supplied success flag. Defaults to true when unset —
/// most orchestrators only invoke the completion hook's notify step on
/// success — but recognizes the common falsy spellings.
fn parse_success(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "failed" | "error" | "aborted"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_flag_recognizes_falsy_spellings() {
        for falsy in ["false", "FALSE", "0", "no", "failed", "ERROR", "aborted"] {
            assert!(!parse_success(falsy), "{falsy}");
        }
        for truthy in ["true", "1", "yes", "SUCCEEDED", "ok", "completed"] {
            assert!(parse_success(truthy), "{truthy}");
        }
    }
}
